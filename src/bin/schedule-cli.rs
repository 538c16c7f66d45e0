use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "schedule-cli")]
#[command(about = "Command-line client for the schedule gateway", long_about = None)]
struct Cli {
    /// Gateway base URL including the API prefix.
    #[arg(short, long, default_value = "http://localhost:8080/api/hmtpk")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List study groups
    Groups,
    /// List teachers
    Teachers,
    /// Show the schedule of a group or a teacher
    Schedule {
        /// User key passed through to the upstream
        #[arg(short, long)]
        key: String,
        #[arg(short, long, conflicts_with = "teacher", required_unless_present = "teacher")]
        group: Option<String>,
        #[arg(short, long)]
        teacher: Option<String>,
        /// Day in DD.MM.YYYY, today when omitted
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show a page of announcements
    Announces {
        #[arg(short, long, default_value_t = 1)]
        page: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let request = match cli.command {
        Commands::Groups => client.post(format!("{}/groups", cli.url)),
        Commands::Teachers => client.post(format!("{}/teachers", cli.url)),
        Commands::Schedule {
            key,
            group,
            teacher,
            date,
        } => {
            let mut query = vec![("key", key)];
            if let Some(group) = group {
                query.push(("group", group));
            }
            if let Some(teacher) = teacher {
                query.push(("teacher", teacher));
            }
            if let Some(date) = date {
                query.push(("date", date));
            }
            client.post(format!("{}/schedule", cli.url)).query(&query)
        }
        Commands::Announces { page } => client
            .post(format!("{}/announces", cli.url))
            .query(&[("page", page)]),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body = res.text().await?;
    println!("{}", render(status, &body)?);
    Ok(())
}

/// Pretty-print a successful JSON body, or turn the response into an error.
fn render(status: StatusCode, body: &str) -> Result<String, String> {
    let json = serde_json::from_str::<Value>(body);

    if !status.is_success() {
        let detail = json
            .ok()
            .and_then(|v| v.get("Error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        return Err(format!("gateway returned status {}: {}", status, detail));
    }

    let json =
        json.map_err(|e| format!("gateway returned a non-JSON body ({}): {}", e, body.trim()))?;
    serde_json::to_string_pretty(&json).map_err(|e| e.to_string())
}
