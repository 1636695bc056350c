use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("readeck-export")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export Readeck annotations as Logseq notes")
        .arg(clap::arg!([BOOKMARK_ID] ... "Bookmark ids to export"))
        .arg(clap::arg!(-i --input <FILE> "Extract from a saved article HTML file, or '-' for stdin").value_name("FILE"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (logseq, json, markdown, html)")
                .value_name("FORMAT")
                .default_value("logseq")
                .value_parser(["logseq", "json", "markdown", "html"]),
        )
        .arg(clap::arg!(--url <URL> "Readeck base URL").value_name("URL"))
        .arg(clap::arg!(--token <TOKEN> "Readeck API token").value_name("TOKEN"))
        .arg(
            clap::arg!(--source <SOURCE> "Annotation source")
                .value_name("SOURCE")
                .value_parser(["article", "api"]),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
        .arg(
            clap::arg!(--completions <SHELL> "Print a shell completion script and exit")
                .value_name("SHELL")
                .value_parser(["bash", "zsh", "fish", "powershell", "elvish"]),
        );

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        clap_complete::generate_to(shell, &mut cmd, "readeck-export", &completions_dir).unwrap();
    }

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
