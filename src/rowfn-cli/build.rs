use std::process::Command;

// Exposed to the crate as GIT_HASH, BUILD_DATE and RUSTC_VERSION
fn main() {
    if let Some(hash) = command_output("git", &["rev-parse", "--short", "HEAD"]) {
        println!("cargo:rustc-env=GIT_HASH={hash}");
    }
    if let Some(date) = command_output("date", &["+%Y-%m-%d"]) {
        println!("cargo:rustc-env=BUILD_DATE={date}");
    }
    // `rustc 1.80.0 (...)` -> `1.80.0`
    if let Some(version) = command_output("rustc", &["--version"])
        .and_then(|out| out.split_whitespace().nth(1).map(str::to_owned))
    {
        println!("cargo:rustc-env=RUSTC_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
}

fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_owned())
}
