use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dsp_marketplace::browse::{ApplicationQuery, ShiftQuery, ShiftSort};
use dsp_marketplace::core::MarketplaceApi;
use dsp_marketplace::domain::model::{ShiftType, Urgency};
use dsp_marketplace::domain::records::{ApplicationReview, ApplicationStatus, CoursePatch};
use dsp_marketplace::utils::error::{ErrorSeverity, MarketplaceError};
use dsp_marketplace::utils::logger;
use dsp_marketplace::utils::validation::{validate_required_field, Validate};
use dsp_marketplace::{ApiClient, AppConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "dsp-admin")]
#[command(about = "Course, messaging and application review operations for the DSP marketplace")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dsp-marketplace.toml")]
    config: String,

    /// Bearer token (overrides api.token)
    #[arg(long, env = "DSP_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print raw JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the trainer's courses
    Courses,
    /// Update fields of a course
    UpdateCourse {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        published: Option<bool>,
    },
    /// Delete a course
    DeleteCourse { id: String },
    /// List conversations
    Conversations,
    /// Send a message to a conversation
    Send { conversation_id: String, text: String },
    /// Mark messages as read
    MarkRead {
        #[arg(required = true)]
        message_ids: Vec<String>,
    },
    /// Browse open shifts
    Shifts {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_wire::<ShiftType>)]
        shift_type: Option<ShiftType>,
        #[arg(long, value_parser = parse_wire::<Urgency>)]
        urgency: Option<Urgency>,
        #[arg(long)]
        min_rate: Option<f64>,
        #[arg(long)]
        max_distance: Option<f64>,
        #[arg(long, value_enum, default_value_t = SortArg::Start)]
        sort: SortArg,
    },
    /// Browse DSP applications
    Applications {
        #[arg(long, value_parser = parse_wire::<ApplicationStatus>)]
        status: Option<ApplicationStatus>,
        #[arg(long)]
        flagged: bool,
        #[arg(long)]
        search: Option<String>,
    },
    /// Approve, reject or flag a DSP application
    Review {
        id: String,
        #[command(subcommand)]
        action: ReviewAction,
    },
}

#[derive(Subcommand)]
enum ReviewAction {
    Approve,
    Reject {
        #[arg(long)]
        reason: String,
    },
    Flag {
        #[arg(long)]
        note: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Start,
    Rate,
    Distance,
    Urgency,
}

impl From<SortArg> for ShiftSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Start => ShiftSort::StartTime,
            SortArg::Rate => ShiftSort::RateDesc,
            SortArg::Distance => ShiftSort::DistanceAsc,
            SortArg::Urgency => ShiftSort::UrgencyDesc,
        }
    }
}

/// 命令列值沿用 API 的字串格式（例如 `overnight`、`high`）
fn parse_wire<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unrecognized value '{}'", value))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = run(args).await {
        match e.downcast_ref::<MarketplaceError>() {
            Some(err) => {
                tracing::error!(
                    "❌ {} (Category: {:?}, Severity: {:?})",
                    err,
                    err.category(),
                    err.severity()
                );
                eprintln!("❌ {}", err.user_friendly_message());
                eprintln!("💡 {}", err.recovery_suggestion());
                let exit_code = match err.severity() {
                    ErrorSeverity::Low | ErrorSeverity::High => 1,
                    ErrorSeverity::Medium => 2,
                    ErrorSeverity::Critical => 3,
                };
                std::process::exit(exit_code);
            }
            None => {
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = AppConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;
    if let Some(token) = &args.token {
        config.api.token = Some(token.clone());
    }
    config.validate()?;

    let token = *validate_required_field("api.token", &config.token())?;
    let client = ApiClient::with_timeout(&config.api.base_url, token, config.request_timeout())?;

    match args.command {
        Command::Courses => {
            let courses = client.get_trainer_courses().await?;
            if args.json {
                return print_json(&courses);
            }
            for course in &courses {
                println!(
                    "{}  {:<40} ${:>7.2}  {:>4} enrolled  {}",
                    course.id,
                    course.title,
                    course.price,
                    course.enrollment_count,
                    if course.published { "published" } else { "draft" }
                );
            }
        }
        Command::UpdateCourse {
            id,
            title,
            description,
            category,
            price,
            published,
        } => {
            let patch = CoursePatch {
                title,
                description,
                category,
                price,
                published,
            };
            let course = client.update_course(&id, &patch).await?;
            tracing::info!("✅ Course {} updated", course.id);
            if args.json {
                return print_json(&course);
            }
            println!("✅ Updated course '{}'", course.title);
        }
        Command::DeleteCourse { id } => {
            client.delete_course(&id).await?;
            println!("✅ Deleted course {}", id);
        }
        Command::Conversations => {
            let conversations = client.get_conversations().await?;
            if args.json {
                return print_json(&conversations);
            }
            for conversation in &conversations {
                let preview = conversation
                    .last_message
                    .as_ref()
                    .map(|m| m.text.as_str())
                    .unwrap_or("(no messages)");
                println!(
                    "{}  {:<30} [{} unread]  {}",
                    conversation.id, conversation.title, conversation.unread_count, preview
                );
            }
        }
        Command::Send {
            conversation_id,
            text,
        } => {
            let message = client.send_message(&conversation_id, &text).await?;
            if args.json {
                return print_json(&message);
            }
            println!("✅ Message {} sent", message.id);
        }
        Command::MarkRead { message_ids } => {
            client.mark_messages_as_read(&message_ids).await?;
            println!("✅ Marked {} messages as read", message_ids.len());
        }
        Command::Shifts {
            search,
            shift_type,
            urgency,
            min_rate,
            max_distance,
            sort,
        } => {
            let shifts = client.get_open_shifts().await?;
            let query = ShiftQuery {
                search,
                shift_type,
                urgency,
                min_rate,
                max_distance,
                sort: sort.into(),
            };
            let visible = query.apply(&shifts);
            if args.json {
                return print_json(&visible);
            }
            for shift in visible {
                let distance = shift
                    .distance_miles
                    .map(|d| format!("{:.1} mi", d))
                    .unwrap_or_else(|| "? mi".to_string());
                println!(
                    "{}  {} ({:.1}h)  {:<32} ${:>6.2}/hr  {:>8}  {:?}",
                    shift.id,
                    shift.starts_at.format("%Y-%m-%d %H:%M"),
                    shift.duration_hours(),
                    shift.title,
                    shift.hourly_rate,
                    distance,
                    shift.urgency
                );
            }
        }
        Command::Applications {
            status,
            flagged,
            search,
        } => {
            let applications = client.get_applications().await?;
            let query = ApplicationQuery {
                status,
                flagged_only: flagged,
                search,
            };
            let visible = query.apply(&applications);
            if args.json {
                return print_json(&visible);
            }
            for application in visible {
                let flag = application
                    .flag
                    .as_ref()
                    .map(|f| format!("  ⚑ {}", f.note))
                    .unwrap_or_default();
                println!(
                    "{}  {:<24} {:<28} {:?}{}",
                    application.id,
                    application.applicant_name,
                    application.email,
                    application.status,
                    flag
                );
            }
        }
        Command::Review { id, action } => {
            let review = match action {
                ReviewAction::Approve => ApplicationReview::approve(),
                ReviewAction::Reject { reason } => ApplicationReview::reject(reason),
                ReviewAction::Flag { note } => ApplicationReview::flag(note),
            };
            let application = client.review_application(&id, &review).await?;
            if args.json {
                return print_json(&application);
            }
            println!(
                "✅ {} is now {:?}{}",
                application.applicant_name,
                application.status,
                if application.is_flagged() { " (flagged)" } else { "" }
            );
        }
    }

    Ok(())
}
