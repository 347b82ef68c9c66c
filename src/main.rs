mod console;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use console::{ConsoleNavigator, ConsoleSink, print_form_errors};
use pitchside_client::{ApiClient, HttpTransport, Session};
use pitchside_config::Config;
use pitchside_store::SqliteCredentialStore;
use pitchside_types::{FormPayload, NotificationSink};
use pitchside_workflow::{
    AsyncOperation, CompletionCallback, ErrorSurface, ExecuteOptions, FixtureRequest, FixtureView,
    FixtureWorkflow, FormErrors, LoginRequest, LoginWorkflow, OperationError, ProfileWorkflow,
    RegistrationRequest, RegistrationView, RegistrationWorkflow,
};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pitchside", version, about = "pitchside — tournament platform client")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session credential.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Remove the stored session credential.
    Logout,
    /// Show whether a session credential is stored.
    Status,
    /// Create an account; a one-time code is sent for `verify`.
    Register {
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
    },
    /// Confirm a pending registration with its one-time code.
    Verify {
        code: String,
    },
    /// Edit the signed-in user's profile.
    Profile {
        /// Field to set, as `name=value`. Repeatable.
        #[arg(long = "set", value_name = "NAME=VALUE")]
        fields: Vec<String>,
        /// Image to upload as the avatar.
        #[arg(long, value_name = "FILE")]
        avatar: Option<PathBuf>,
    },
    /// GET a resource and print the JSON reply.
    Get {
        /// Resource path relative to the configured base URL.
        path: String,
    },
    /// Generate fixtures for a tournament.
    Fixtures {
        tournament: String,
        /// Persist the fixtures instead of printing a draft.
        #[arg(long)]
        save: bool,
        /// Discard and rebuild existing fixtures.
        #[arg(long)]
        regenerate: bool,
    },
}

struct App {
    client: Arc<ApiClient>,
    sink: Arc<dyn NotificationSink>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("config error")?;
    init_tracing(&config);

    let app = build_app(&config).await?;
    match cli.command {
        Commands::Login { email, password } => cmd_login(&app, email, password).await,
        Commands::Logout => cmd_logout(&app).await,
        Commands::Status => {
            cmd_status(&app);
            Ok(())
        }
        Commands::Register {
            user_name,
            email,
            phone,
            password,
        } => {
            let request = RegistrationRequest {
                user_name,
                email,
                phone_number: phone,
                password,
            };
            cmd_register(&app, &request).await
        }
        Commands::Verify { code } => cmd_verify(&app, &code).await,
        Commands::Profile { fields, avatar } => cmd_profile(&app, &fields, avatar).await,
        Commands::Get { path } => cmd_get(&app, path).await,
        Commands::Fixtures {
            tournament,
            save,
            regenerate,
        } => cmd_fixtures(&app, tournament, save, regenerate).await,
    }
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn build_app(config: &Config) -> Result<App> {
    let store = Arc::new(open_store(config.store.path.clone()).await?);
    let session = Arc::new(Session::new(
        store,
        Arc::new(ConsoleNavigator),
        &config.session,
    ));
    if session.restore().await? {
        tracing::debug!("restored stored session");
    }
    let transport = Arc::new(HttpTransport::new(config.base_url.clone())?);
    let client = ApiClient::new(transport, session)
        .with_update_content_type(&config.client.update_content_type)?;
    Ok(App {
        client: Arc::new(client),
        sink: Arc::new(ConsoleSink),
    })
}

async fn cmd_login(app: &App, email: String, password: String) -> Result<()> {
    let form = FormErrors::new();
    let login = LoginWorkflow::new(app.client.clone(), app.sink.clone());
    let result = login.submit(&LoginRequest { email, password }, &form).await;
    finish(result, &form)
}

async fn cmd_logout(app: &App) -> Result<()> {
    app.client.session().sign_out().await?;
    eprintln!("logged out");
    Ok(())
}

fn cmd_status(app: &App) {
    let status = if app.client.session().is_authenticated() {
        "authenticated"
    } else {
        "not authenticated"
    };
    println!("{status}");
}

async fn cmd_register(app: &App, request: &RegistrationRequest) -> Result<()> {
    let form = FormErrors::new();
    let flow = RegistrationWorkflow::new(app.client.clone(), app.sink.clone());
    let mut view = RegistrationView::default();
    let result = flow.submit(request, &form, &mut view).await;
    finish(result, &form)?;
    if view.otp_open {
        eprintln!("run `pitchside verify <CODE>` with the code you received");
    }
    Ok(())
}

async fn cmd_verify(app: &App, code: &str) -> Result<()> {
    let form = FormErrors::new();
    let flow = RegistrationWorkflow::new(app.client.clone(), app.sink.clone());
    // A fresh process: the pending registration comes back from the store.
    let mut view = RegistrationView::default();
    let result = flow.verify_otp(code, &form, &mut view).await;
    finish(result, &form)
}

async fn cmd_profile(app: &App, fields: &[String], avatar: Option<PathBuf>) -> Result<()> {
    let mut payload = FormPayload::new();
    for field in fields {
        let (name, value) = field
            .split_once('=')
            .with_context(|| format!("expected NAME=VALUE, got '{field}'"))?;
        payload = payload.text(name, value);
    }
    if let Some(path) = avatar {
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "avatar".to_string(), |n| n.to_string_lossy().into_owned());
        payload = payload.file("avatar", file_name, image_mime(&path), bytes);
    }

    let form = FormErrors::new();
    let flow = ProfileWorkflow::new(app.client.clone(), app.sink.clone());
    let on_complete: CompletionCallback = Box::new(|data: &serde_json::Value| {
        if !data.is_null() {
            println!("{data:#}");
        }
    });
    let result = flow.submit(payload, &form, Some(on_complete)).await;
    finish(result, &form)
}

async fn cmd_get(app: &App, path: String) -> Result<()> {
    let surface = Arc::new(ErrorSurface::new());
    let op = AsyncOperation::new(app.sink.clone(), surface.clone());
    let options = ExecuteOptions::builder()
        .error_message(format!("Could not load {path}"))
        .escalate(true)
        .build();
    let client = app.client.clone();
    let result = op
        .execute(
            async move { client.read(&path).await.map_err(OperationError::from) },
            options,
        )
        .await;
    match result {
        Ok(data) => {
            println!("{data:#}");
            Ok(())
        }
        Err(err) => {
            if let Some(message) = surface.message() {
                surface.dismiss();
                anyhow::bail!("{message}");
            }
            Err(err.into())
        }
    }
}

async fn cmd_fixtures(app: &App, tournament: String, save: bool, regenerate: bool) -> Result<()> {
    let form = FormErrors::new();
    let flow = FixtureWorkflow::new(app.client.clone(), app.sink.clone());
    let mut view = FixtureView {
        regenerate,
        ..FixtureView::default()
    };
    let request = FixtureRequest {
        tournament_id: tournament,
        save,
    };
    let result = flow.generate(&request, &form, &mut view).await;
    finish(result, &form)?;
    tracing::debug!(active = ?view.active, preview = view.preview_open, "fixture view updated");
    if let Some(generated) = &view.generated {
        println!("{generated:#}");
    }
    Ok(())
}

/// Map a workflow result to the process result. Rejections were already
/// shown as notifications or form errors.
fn finish<T>(result: Result<T, OperationError>, form: &FormErrors) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(OperationError::AlreadyReported) => {
            print_form_errors(form);
            anyhow::bail!("request rejected");
        }
        Err(err) => Err(err.into()),
    }
}

fn image_mime(path: &std::path::Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime.to_string())
}

async fn open_store(path: Option<PathBuf>) -> Result<SqliteCredentialStore> {
    let path = path.unwrap_or_else(default_db_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let url = format!("sqlite://{}", path.display());
    SqliteCredentialStore::new(&url)
        .await
        .map_err(|e| anyhow::anyhow!("database error: {e}"))
}

fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".pitchside").join("session.db")
}
