use std::env;

#[tokio::main]
async fn main() {
    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = projeta::api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Some("simulate") => {
            let mut forwarded = vec![raw_args[0].clone()];
            forwarded.extend(raw_args[2..].iter().cloned());
            match projeta::api::run_simulate_cli(&forwarded) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(2);
                }
            }
        }
        _ => {
            eprintln!("Usage: cargo run -- serve [port]");
            eprintln!("       cargo run -- simulate [--help | options]");
            std::process::exit(1);
        }
    }
}
