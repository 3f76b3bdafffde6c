fn main() {
    // Tell Cargo to rerun this build script if app.rc or app.manifest changes.
    println!("cargo:rerun-if-changed=app.rc");
    println!("cargo:rerun-if-changed=app.manifest");

    // Only Windows executables carry the resource script. It provides the
    // common controls v6 manifest the message boxes and pickers render with.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        embed_manifest();
    }
}

#[cfg(windows)]
fn embed_manifest() {
    // Pass an empty slice for options if no specific flags are needed.
    if let Err(e) = embed_resource::compile("app.rc", &[] as &[&str]).manifest_optional() {
        println!("cargo:warning=Failed to embed app.rc: {e}");
    }
}

#[cfg(not(windows))]
fn embed_manifest() {
    println!("cargo:warning=Cross-compiling for Windows without the resource compiler; app.rc is not embedded.");
}
