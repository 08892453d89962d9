fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile protobuf when the server feature is enabled
    #[cfg(feature = "server")]
    {
        let protos = ["proto/demo.proto", "proto/health.proto"];
        for proto in &protos {
            println!("cargo:rerun-if-changed={proto}");
        }
        tonic_build::configure()
            .build_server(true)
            .build_client(true)
            .compile_protos(&protos, &["proto"])?;
    }

    Ok(())
}
