use std::env;

use clap::Parser;

#[tokio::main]
async fn main() {
    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = paydown::api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Some("compare") => {
            let cli = paydown::api::Cli::parse_from(raw_args[1..].iter());
            match paydown::api::run_comparison_json(cli) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("Usage: cargo run -- serve [port]");
            eprintln!(
                "       cargo run -- compare --loan-amount <amt> --interest-rate <pct> \
                 --emi <amt> --savings <amt> --investment-return <pct> \
                 [--savings-growth <pct>] --horizon-years <n>"
            );
            std::process::exit(1);
        }
    }
}
