//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves `static/` locally. Pass `--no-build` to serve what is there.

use std::env;
use std::process::{exit, Command, Stdio};

const PORT: &str = "8000";

fn main() {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return;
    }

    if !env::args().any(|a| a == "--no-build") {
        println!("Building WASM pkg …");
        match Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
            .status()
        {
            Ok(st) if st.success() => {}
            Ok(_) => {
                eprintln!(
                    "wasm-pack finished with errors. Ensure wasm-pack is installed \
                     (https://rustwasm.github.io/wasm-pack/)."
                );
                exit(1);
            }
            Err(_) => {
                eprintln!(
                    "wasm-pack not found in PATH. Skipping wasm build; \
                     the site may serve stale artifacts."
                );
            }
        }
    }

    println!(
        "Serving http://127.0.0.1:{PORT}/?demo=file \
         (demos: file, mic, texture, triangle, player)"
    );
    let status = Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .status();

    match status {
        Ok(st) if st.success() => {}
        Ok(st) => {
            eprintln!("http server exited with {st}");
            exit(1);
        }
        Err(err) => {
            eprintln!("failed to start http server: {err}");
            exit(1);
        }
    }
}
