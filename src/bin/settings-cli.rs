use clap::{Parser, Subcommand};
use reqwest::StatusCode;

use net64_settings::config::SupervisorConfig;
use net64_settings::supervisor::{process_status, Pm2Supervisor};

#[derive(Parser)]
#[command(name = "settings-cli")]
#[command(about = "Operator CLI for the net64 settings endpoint", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the supervisor's status row for the managed process
    Status {
        #[arg(long, default_value = "pm2")]
        program: String,

        #[arg(long, default_value = "net64")]
        name: String,

        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Print the rendered settings form
    Show,
    /// Submit settings as KEY=VALUE pairs
    Update {
        #[arg(required = true, value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status {
            program,
            name,
            timeout_secs,
        } => {
            let supervisor = Pm2Supervisor::new(
                &SupervisorConfig {
                    program,
                    process_name: name.clone(),
                    ..SupervisorConfig::default()
                },
                timeout_secs,
            );
            let row = process_status(&supervisor, &name).await?;
            println!("{}", serde_json::to_string_pretty(&row)?);
        }
        Commands::Show => {
            let res = client.get(&cli.url).send().await?;
            print_response(res).await?;
        }
        Commands::Update { fields } => {
            let res = client.post(&cli.url).form(&fields).send().await?;
            let status = res.status();
            if status == StatusCode::OK {
                println!("Submitted {} field(s); check the endpoint log for the restart result", fields.len());
            } else {
                print_response(res).await?;
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: settings endpoint returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("name=Lobby").unwrap(), ("name".into(), "Lobby".into()));
        assert_eq!(parse_field("motd=a=b").unwrap(), ("motd".into(), "a=b".into()));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
