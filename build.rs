fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/reservation.proto");

    // protox compiles the proto in-process, so no system protoc is required.
    let file_descriptors = protox::compile(["proto/reservation.proto"], ["proto"])?;

    tonic_build::configure()
        .build_client(true)
        .build_server(true)
        .compile_fds(file_descriptors)?;

    Ok(())
}
