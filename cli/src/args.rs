use clap::{Args, Parser, Subcommand};
use diasys_cli::config::DEFAULT_CONFIG_PATH;
use diasys_cli::OutputFormat;
use std::path::PathBuf;

/// DiaSys CLI - Terminal client for the DiaSys diabetes-risk screening service
#[derive(Parser, Debug)]
#[command(name = "diasys")]
#[command(author = "DiaSys Team")]
#[command(version)]
#[command(about = "Diabetes-risk screening from the terminal", long_about = None)]
pub struct Cli {
    /// API base URL (default: config file, then the public DiaSys server)
    #[arg(short = 'u', long = "url", env = "DIASYS_URL", global = true)]
    pub url: Option<String>,

    /// Configuration file path
    #[arg(long = "config", default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Credentials file path (default: ~/.config/diasys/credentials.toml)
    #[arg(long = "credentials-file", env = "DIASYS_CREDENTIALS_FILE", global = true)]
    pub credentials_file: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", global = true)]
    pub format: Option<OutputFormat>,

    /// Enable JSON output (shorthand for --format=json)
    #[arg(long = "json", conflicts_with = "format", global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account (does not log in)
    Register(RegisterArgs),

    /// Log in and store the session
    Login(LoginArgs),

    /// Log out and forget the stored session
    Logout,

    /// Show whether you are logged in
    Status,

    /// Run a diabetes-risk prediction
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Password (prompted if omitted)
    #[arg(long, env = "DIASYS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Password confirmation (prompted if omitted)
    #[arg(long = "confirm-password")]
    pub confirm_password: Option<String>,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Email address used as the username
    #[arg(long)]
    pub email: String,

    /// Password (prompted if omitted)
    #[arg(long, env = "DIASYS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
#[command(allow_negative_numbers = true)]
pub struct PredictArgs {
    /// Plasma glucose concentration (mg/dL)
    #[arg(long)]
    pub glucose: f64,

    /// Diastolic blood pressure (mmHg)
    #[arg(long = "blood-pressure")]
    pub blood_pressure: f64,

    /// Weight (kg)
    #[arg(long)]
    pub weight: f64,

    /// Height (m)
    #[arg(long)]
    pub height: f64,

    /// Age (years, at most 120)
    #[arg(long)]
    pub age: f64,

    /// 2-hour serum insulin (mu U/ml)
    #[arg(long, default_value_t = 0.0)]
    pub insulin: f64,

    /// Triceps skin fold thickness (mm)
    #[arg(long = "skin-thickness", default_value_t = 0.0)]
    pub skin_thickness: f64,

    /// Diabetes pedigree function (0 to 2.5)
    #[arg(long = "diabetes-pedigree", default_value_t = 0.0)]
    pub diabetes_pedigree: f64,

    /// Number of pregnancies (at most 20)
    #[arg(long, default_value_t = 0.0)]
    pub pregnancies: f64,
}

impl Cli {
    /// Explicit output format from flags, if any
    pub fn output_format(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else {
            self.format
        }
    }
}
