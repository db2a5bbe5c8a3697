use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use applicant_registry::auth::{AuthContext, MemorySessionStore, Role};
use applicant_registry::core::db::{
    AccountRepository, Applicant, ApplicantRepository, Barangay, Gender, NewAccount, Program,
    RegistryDb, Status,
};
use applicant_registry::normalize::{format_date, today};
use applicant_registry::report::{ReportData, ReportKind};
use applicant_registry::{
    AgeRange, FilterOptions, FormData, RegistryConfig, RegistryError, export, filter_applicants,
    paginate, submit,
};

#[derive(Parser)]
#[command(name = "registry")]
#[command(about = "GIP/TUPAD applicant registry")]
struct Cli {
    /// Registry archive (overrides REGISTRY_FILE)
    #[arg(long, value_name = "FILE", global = true)]
    file: Option<PathBuf>,

    /// Allow any status change, logging moves outside the transition table
    #[arg(long, global = true)]
    allow_any_status: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new applicant
    Add {
        #[arg(long)]
        program: Program,
        /// Form field assignment, e.g. firstName=juan (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
        #[arg(long, value_name = "FILE")]
        resume: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        photo: Option<PathBuf>,
    },
    /// Edit an applicant's form fields
    Update {
        #[arg(long)]
        program: Program,
        code: String,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
        #[arg(long, value_name = "FILE")]
        resume: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        photo: Option<PathBuf>,
    },
    /// Remove an applicant
    Delete {
        #[arg(long)]
        program: Program,
        code: String,
    },
    /// List applicants, filtered and paginated
    List {
        #[arg(long)]
        program: Program,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        barangay: Option<Barangay>,
        #[arg(long)]
        gender: Option<Gender>,
        #[arg(long, value_enum)]
        age_range: Option<AgeRange>,
        #[arg(long)]
        education: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page (overrides REGISTRY_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Show one applicant
    Show {
        #[arg(long)]
        program: Program,
        code: String,
        #[arg(long)]
        json: bool,
    },
    /// Show report statistics
    Report {
        #[arg(long)]
        program: Program,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_enum, default_value_t = ReportKind::Summary)]
        kind: ReportKind,
        #[arg(long)]
        json: bool,
    },
    /// Write an applicant's application form rows as CSV
    ExportForm {
        #[arg(long)]
        program: Program,
        code: String,
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
    /// Export a report as CSV (admin) or printable text (any staff)
    ExportReport {
        #[arg(long)]
        program: Program,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_enum, default_value_t = ReportKind::Summary)]
        kind: ReportKind,
        #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
        format: ReportFormat,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Output file; stdout when omitted
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Save a stored attachment to disk
    Attachment {
        #[arg(long)]
        program: Program,
        code: String,
        #[arg(long, value_enum)]
        which: AttachmentKind,
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Manage staff accounts
    #[command(subcommand)]
    User(UserCommand),
}

#[derive(Subcommand)]
enum UserCommand {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum, default_value_t = Role::Staff)]
        role: Role,
    },
    List,
    /// Check a username and password
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Csv,
    Print,
}

#[derive(Clone, Copy, ValueEnum)]
enum AttachmentKind {
    Resume,
    Photo,
}

impl Command {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Update { .. }
                | Command::Delete { .. }
                | Command::User(UserCommand::Add { .. })
        )
    }
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected FIELD=VALUE, got {:?}", raw))
}

/// Turn validation failures into their dialog title and message.
fn user_facing(err: RegistryError) -> anyhow::Error {
    match err {
        RegistryError::Validation(e) => anyhow::anyhow!("{}: {}", e.title(), e),
        other => other.into(),
    }
}

async fn find_applicant(db: &RegistryDb, program: Program, code: &str) -> anyhow::Result<Applicant> {
    db.get_applicant_by_code(program, code)
        .await?
        .with_context(|| format!("No {} applicant with code {}", program, code))
}

fn print_applicant(applicant: &Applicant) {
    println!("{} ({})", applicant.full_name(), applicant.code);
    println!("  Program:     {}", applicant.program());
    println!("  Status:      {}", applicant.status);
    println!("  Birth date:  {} (age {})", format_date(applicant.birth_date), applicant.age);
    println!("  Gender:      {}", applicant.gender.label());
    println!("  Barangay:    {}", applicant.barangay);
    println!("  Contact:     {}", applicant.contact_number);
    println!("  Education:   {}", applicant.educational_attainment);
    if let Some(tupad) = applicant.details.tupad() {
        println!("  ID:          {} {}", tupad.id_type, tupad.id_number);
        println!("  Occupation:  {}", tupad.occupation);
    }
    if let Some(resume) = &applicant.resume {
        println!("  Resume:      {}", resume.display_name());
    }
    if let Some(photo) = &applicant.photo {
        println!("  Photo:       {}", photo.display_name());
    }
    println!(
        "  Submitted:   {} by {}",
        format_date(applicant.date_submitted),
        applicant.encoder
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("applicant_registry=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let mut config = RegistryConfig::from_env()?;
    if let Some(file) = args.file {
        config.registry_file = file;
    }
    if args.allow_any_status {
        config.enforce_status_transitions = false;
    }

    let db = RegistryDb::new(&config.registry_file)
        .await?
        .with_status_enforcement(config.enforce_status_transitions);
    let mutates = args.command.mutates();

    match args.command {
        Command::Add {
            program,
            fields,
            resume,
            photo,
        } => {
            let mut form = FormData::initialize(None);
            for (field, value) in &fields {
                form.set(field, value)?;
            }
            form.resume_file = resume;
            form.photo_file = photo;
            let added = submit(&db, &form, program, &config.encoder, None, today())
                .await
                .map_err(user_facing)?;
            println!("Added {} ({})", added.code, added.full_name());
        }
        Command::Update {
            program,
            code,
            fields,
            resume,
            photo,
        } => {
            let current = find_applicant(&db, program, &code).await?;
            let mut form = FormData::initialize(Some(&current));
            for (field, value) in &fields {
                form.set(field, value)?;
            }
            form.resume_file = resume;
            form.photo_file = photo;
            let updated = submit(&db, &form, program, &config.encoder, Some(&current), today())
                .await
                .map_err(user_facing)?;
            println!("Updated {} ({})", updated.code, updated.full_name());
        }
        Command::Delete { program, code } => {
            let applicant = find_applicant(&db, program, &code).await?;
            db.delete_applicant(applicant).await?;
            println!("Deleted {}", code);
        }
        Command::List {
            program,
            search,
            status,
            barangay,
            gender,
            age_range,
            education,
            page,
            page_size,
        } => {
            let applicants = db.get_applicants(program).await?;
            let options = FilterOptions {
                search_term: search,
                status,
                barangay,
                gender,
                age_range,
                education,
            };
            let matching: Vec<&Applicant> = filter_applicants(&applicants, &options);
            let page = paginate(&matching, page, page_size.unwrap_or(config.page_size));
            for applicant in page.items {
                println!(
                    "{:<16} {:<36} {:<18} {:>3}  {}",
                    applicant.code,
                    applicant.full_name(),
                    applicant.barangay,
                    applicant.age,
                    applicant.status
                );
            }
            let shown_to = page.end_index.min(page.total_count);
            let shown_from = if page.items.is_empty() {
                0
            } else {
                page.start_index + 1
            };
            println!(
                "Showing {} to {} of {} entries (page(s): {})",
                shown_from,
                shown_to,
                page.total_count,
                page.total_pages
            );
        }
        Command::Show {
            program,
            code,
            json,
        } => {
            let applicant = find_applicant(&db, program, &code).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&applicant)?);
            } else {
                print_applicant(&applicant);
            }
        }
        Command::Report {
            program,
            year,
            kind,
            json,
        } => {
            let data = ReportData::load(&db, program, year).await?;
            let report = data.report(kind);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let years: Vec<String> = data.available_years.iter().map(i32::to_string).collect();
                println!("{} report, years on record: {}", program, years.join(", "));
                for row in export::report_rows(&report) {
                    println!("{}", row.join("\t"));
                }
            }
        }
        Command::ExportForm {
            program,
            code,
            out_dir,
        } => {
            let applicant = find_applicant(&db, program, &code).await?;
            let sheet = export::application_form(&applicant);
            let path = out_dir.join(export::file_name(&applicant)).with_extension("csv");
            tokio::fs::write(&path, sheet.to_csv())
                .await
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Wrote {} rows to {:?}", sheet.rows.len(), path);
        }
        Command::ExportReport {
            program,
            year,
            kind,
            format,
            username,
            password,
            out,
        } => {
            let auth = AuthContext::new(MemorySessionStore::new(), config.session_ttl);
            if !auth.login(&db, &username, &password).await {
                anyhow::bail!("Invalid username or password");
            }
            let data = ReportData::load(&db, program, year).await?;
            let text = match format {
                ReportFormat::Csv => export::export_report_csv(&auth, &data.report(kind))?,
                ReportFormat::Print => export::print_summary(&auth, &data.summary, program, year)?,
            };
            auth.logout();
            match out {
                Some(path) => {
                    tokio::fs::write(&path, text)
                        .await
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Wrote {:?}", path);
                }
                None => println!("{}", text),
            }
        }
        Command::Attachment {
            program,
            code,
            which,
            out,
        } => {
            let applicant = find_applicant(&db, program, &code).await?;
            let attachment = match which {
                AttachmentKind::Resume => applicant.resume.as_ref(),
                AttachmentKind::Photo => applicant.photo.as_ref(),
            }
            .with_context(|| format!("{} has no such attachment", code))?;
            let bytes = attachment.decode()?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("Failed to write {:?}", out))?;
            println!("Saved {} ({} bytes) to {:?}", attachment.file_name, bytes.len(), out);
        }
        Command::User(UserCommand::Add {
            username,
            password,
            role,
        }) => {
            let user = db
                .add_account(&NewAccount {
                    username,
                    password,
                    role,
                })
                .await?;
            println!("Added {} ({})", user.username, user.role);
        }
        Command::User(UserCommand::List) => {
            for user in db.get_accounts().await? {
                println!("{:<24} {}", user.username, user.role);
            }
        }
        Command::User(UserCommand::Login { username, password }) => {
            let auth = AuthContext::new(MemorySessionStore::new(), config.session_ttl);
            if auth.login(&db, &username, &password).await {
                let state = auth.state();
                if let Some(user) = state.user {
                    println!("Signed in as {} ({})", user.username, user.role);
                }
                auth.logout();
            } else {
                anyhow::bail!("Invalid username or password");
            }
        }
    }

    if mutates {
        db.save_registry().await?;
    }
    Ok(())
}
