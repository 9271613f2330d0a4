// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .action(ArgAction::SetTrue)
        .help(help)
}

fn build_cli() -> Command {
    Command::new("scriptwrap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate, build and verify a container recipe for a script")
        .args_conflicts_with_subcommands(true)
        .subcommand_negates_reqs(true)
        .arg(flag(
            "force",
            "Continue even if the security scan blocks (not recommended)",
        ))
        .arg(flag(
            "generate-only",
            "Print the validated recipe without building or running it",
        ))
        .arg(flag(
            "keep-recipe-copy",
            "Keep <tag>.Dockerfile in the working directory while the image builds and runs",
        ))
        .arg(
            Arg::new("script")
                .value_name("SCRIPT")
                .required(true)
                .help("Script to containerize"),
        )
        .arg(
            Arg::new("readme")
                .value_name("README")
                .required(true)
                .help("README describing the script"),
        )
        .arg(
            Arg::new("example")
                .value_name("EXAMPLE")
                .help("Example invocation (default: taken from the README's \"## Example\" section)"),
        )
        .arg(
            Arg::new("expected")
                .value_name("EXPECTED")
                .help("Expected output: a substring, or /regex/"),
        )
        .subcommand(
            Command::new("suite")
                .about("Run every case in a TOML suite file through the full pipeline")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .help("Suite file with [[case]] entries"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("scriptwrap.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
