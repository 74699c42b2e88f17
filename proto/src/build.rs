use std::{env, fs, io, path::PathBuf};

use prost::Message;

fn main() -> io::Result<()> {
    let protos = fs::read_dir("proto")?
        .filter(|a| {
            if let Ok(a) = a {
                a.file_type().map(|t| t.is_file()).unwrap_or(false)
            } else {
                false
            }
        })
        .map(|a| a.map(|a| a.path().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>, _>>()?;

    // protox keeps the build free of a system protoc.
    let file_descriptor_set = protox::compile(&protos, ["proto/"])
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(
        out_dir.join("file_descriptor_set.bin"),
        file_descriptor_set.encode_to_vec(),
    )?;

    prost_build::Config::new().compile_fds(file_descriptor_set)?;

    for proto in &protos {
        println!("cargo:rerun-if-changed={proto}");
    }
    Ok(())
}
