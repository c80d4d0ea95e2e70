//! Command-line admin panel for Bongdaha
//!
//! Talks to the admin API the same way the browser panel does: log in once,
//! the bearer token is kept in a session file, and every page of the panel
//! has a subcommand.
//!
//! # Usage
//!
//! ```bash
//! bongdaha-admin login --username admin
//! bongdaha-admin articles list --status draft
//! bongdaha-admin articles publish 12 13
//! bongdaha-admin categories create --name "Ngoại hạng Anh"
//! bongdaha-admin blacklist add 203.0.113.9 --reason spam
//! bongdaha-admin visitors trend --days 30
//! ```
//!
//! The admin API root comes from `--api-url`, then `ADMIN_API_URL`, then
//! `config.yml`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bongdaha::admin::{
    format_date, format_file_size, truncate, AdminClient, AdminError, Pagination, Table,
    TokenStore, MIN_PASSWORD_LEN,
};
use bongdaha::config::Config;
use bongdaha::models::{
    Article, ArticleInput, ArticleQuery, ArticleStatus, BlacklistInput, CategoryInput,
    ImageFilter, WhitelistInput,
};
use bongdaha::tracker::FileStorage;

const PAGE_SIZE: u64 = 20;

/// CLI admin panel for Bongdaha
#[derive(Parser)]
#[command(name = "bongdaha-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Admin API root, e.g. http://localhost:8080
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// File holding the login session
    #[arg(long, global = true, default_value = ".bongdaha-admin.json")]
    session: PathBuf,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Change the admin password
    Password,
    /// Today's traffic and content totals
    Dashboard,
    /// Manage articles
    Articles {
        #[command(subcommand)]
        action: ArticleAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage uploaded images
    Images {
        #[command(subcommand)]
        action: ImageAction,
    },
    /// Blocked IPs
    Blacklist {
        #[command(subcommand)]
        action: BlacklistAction,
    },
    /// IPs exempt from blocking
    Whitelist {
        #[command(subcommand)]
        action: WhitelistAction,
    },
    /// Visitor statistics
    Visitors {
        #[command(subcommand)]
        action: VisitorAction,
    },
    /// System information and maintenance
    System {
        #[command(subcommand)]
        action: SystemAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Published,
    Draft,
}

impl From<StatusArg> for ArticleStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Published => ArticleStatus::Published,
            StatusArg::Draft => ArticleStatus::Draft,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ImageFilterArg {
    All,
    Used,
    Unused,
}

impl From<ImageFilterArg> for ImageFilter {
    fn from(filter: ImageFilterArg) -> Self {
        match filter {
            ImageFilterArg::All => ImageFilter::All,
            ImageFilterArg::Used => ImageFilter::Used,
            ImageFilterArg::Unused => ImageFilter::Unused,
        }
    }
}

#[derive(clap::Args)]
struct ArticleFields {
    #[arg(long)]
    title: Option<String>,
    /// Lowercase letters, digits and hyphens
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    summary: Option<String>,
    /// Read the HTML body from a file
    #[arg(long)]
    content_file: Option<PathBuf>,
    #[arg(long)]
    cover_image: Option<String>,
    #[arg(long)]
    category: Option<i64>,
    #[arg(long)]
    publish: Option<bool>,
    #[arg(long)]
    recommended: Option<bool>,
}

#[derive(Subcommand)]
enum ArticleAction {
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(short, long)]
        keyword: Option<String>,
    },
    Show {
        id: i64,
    },
    Create {
        #[command(flatten)]
        fields: ArticleFields,
    },
    Update {
        id: i64,
        #[command(flatten)]
        fields: ArticleFields,
    },
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    Publish {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    Unpublish {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 0)]
        sort_order: i32,
        #[arg(long)]
        disabled: bool,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        sort_order: Option<i32>,
        #[arg(long)]
        enabled: Option<bool>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum ImageAction {
    Stats,
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u64,
        #[arg(long, value_enum, default_value = "all")]
        filter: ImageFilterArg,
    },
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    MarkUsed {
        id: i64,
    },
    MarkUnused {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum BlacklistAction {
    List,
    Add {
        ip: String,
        #[arg(long, default_value = "")]
        reason: String,
        /// `YYYY-MM-DD HH:MM:SS`; permanent when omitted
        #[arg(long)]
        expires: Option<String>,
    },
    Remove {
        id: i64,
    },
}

#[derive(Subcommand)]
enum WhitelistAction {
    List,
    Add {
        ip: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Remove {
        id: i64,
    },
}

#[derive(Subcommand)]
enum VisitorAction {
    Stats,
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u64,
        /// Only visits on this day, `YYYY-MM-DD`
        #[arg(long)]
        date: Option<String>,
    },
    Trend {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

#[derive(Subcommand)]
enum SystemAction {
    Info,
    ClientIp,
    ClearVisitors,
    ClearStats,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        if matches!(e.downcast_ref::<AdminError>(), Some(AdminError::Unauthorized)) {
            eprintln!(
                "{}",
                "Your session has expired. Run `bongdaha-admin login` again.".yellow()
            );
        }
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let api_url = match cli.api_url {
        Some(url) => url,
        None => Config::load_with_env(Path::new("config.yml"))
            .context("Failed to load configuration")?
            .admin
            .api_url,
    };

    let storage = FileStorage::open(&cli.session)
        .with_context(|| format!("Failed to open session file {}", cli.session.display()))?;
    let client = AdminClient::new(&api_url, TokenStore::new(Arc::new(storage)))
        .context("Failed to build HTTP client")?;

    let requires_login = !matches!(cli.command, Commands::Login { .. } | Commands::Logout);
    if requires_login && !client.is_logged_in() {
        anyhow::bail!("Not logged in. Run `bongdaha-admin login` first.");
    }

    let yes = cli.yes;
    match cli.command {
        Commands::Login { username } => login(&client, username).await,
        Commands::Logout => {
            client.logout()?;
            println!("{}", "Logged out".green());
            Ok(())
        }
        Commands::Whoami => {
            match client.tokens().user() {
                Some(user) => println!("{} (id {})", user.username.cyan(), user.id),
                None => println!("{}", "Logged in".cyan()),
            }
            Ok(())
        }
        Commands::Password => change_password(&client).await,
        Commands::Dashboard => dashboard(&client).await,
        Commands::Articles { action } => articles(&client, action, yes).await,
        Commands::Categories { action } => categories(&client, action, yes).await,
        Commands::Images { action } => images(&client, action, yes).await,
        Commands::Blacklist { action } => blacklist(&client, action, yes).await,
        Commands::Whitelist { action } => whitelist(&client, action, yes).await,
        Commands::Visitors { action } => visitors(&client, action).await,
        Commands::System { action } => system(&client, action, yes).await,
    }
}

/// Ask before a destructive action unless `--yes` was given
fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !confirmed {
        println!("{}", "Cancelled".red());
    }
    Ok(confirmed)
}

fn success(message: &str) {
    println!("{} {}", "✔".green().bold(), message.green());
    println!();
}

fn print_pager(pager: &Pagination) {
    if pager.has_controls() {
        println!();
        println!(
            "  {}   page {} of {}, {} total",
            pager.to_string().bright_black(),
            pager.page,
            pager.total_pages(),
            pager.total
        );
    }
    println!();
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

// ---- Auth ----

async fn login(client: &AdminClient, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Username")
            .with_initial_text("admin")
            .interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    let user = client.login(&username, &password).await?;
    success(&format!("Logged in as {}", user.username));
    Ok(())
}

async fn change_password(client: &AdminClient) -> Result<()> {
    let old = Password::new().with_prompt("Current password").interact()?;
    let new = Password::new()
        .with_prompt(format!("New password (min {} characters)", MIN_PASSWORD_LEN))
        .with_confirmation("Repeat new password", "Passwords do not match")
        .interact()?;

    let message = client.change_password(&old, &new).await?;
    success(&message);
    Ok(())
}

async fn dashboard(client: &AdminClient) -> Result<()> {
    let dashboard = client.dashboard().await?;

    println!("{}", "📊 Dashboard".bright_blue().bold());
    println!();
    let mut table = Table::new(["", "PV", "UV", "IPs"]);
    for (label, day) in [("Today", &dashboard.today), ("Yesterday", &dashboard.yesterday)] {
        table.row([
            label.to_string(),
            day.pv.to_string(),
            day.uv.to_string(),
            day.ips.to_string(),
        ]);
    }
    println!("{}", table);
    println!();
    println!("  Online now:   {}", dashboard.realtime_online.to_string().bright_green().bold());
    println!(
        "  Articles:     {} ({} published)",
        dashboard.total_articles, dashboard.published_articles
    );
    println!("  Categories:   {}", dashboard.total_categories);
    println!("  Blocked IPs:  {}", dashboard.blacklist_count);
    println!();

    let mut trend = Table::new(["Date", "PV", "UV", "IPs"]).empty_message("No data");
    for point in &dashboard.trends {
        trend.row([
            point.date.clone(),
            point.pv.to_string(),
            point.uv.to_string(),
            point.ips.to_string(),
        ]);
    }
    println!("{}", trend);
    println!();
    Ok(())
}

// ---- Articles ----

async fn list_articles(client: &AdminClient, query: &ArticleQuery) -> Result<()> {
    let list = client.articles(query).await?;

    println!("{}", "📰 Articles".bright_blue().bold());
    println!();
    let mut table = Table::new(["ID", "Title", "Category", "Status", "Views", "Updated"])
        .empty_message("No articles");
    for article in &list.articles {
        table.row([
            article.id.to_string(),
            truncate(&article.title, 40),
            article.category_name.clone(),
            article.status_label().to_string(),
            article.view_count.to_string(),
            format_date(article.updated_at.as_ref().or(article.created_at.as_ref())),
        ]);
    }
    println!("{}", table);
    print_pager(&Pagination::new(list.page.total, list.page.page, list.page.page_size));
    Ok(())
}

fn apply_fields(mut input: ArticleInput, fields: ArticleFields) -> Result<ArticleInput> {
    if let Some(title) = fields.title {
        input.title = title;
    }
    if let Some(slug) = fields.slug {
        input.slug = slug;
    }
    if let Some(summary) = fields.summary {
        input.summary = summary;
    }
    if let Some(path) = fields.content_file {
        input.content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    if let Some(cover) = fields.cover_image {
        input.cover_image = cover;
    }
    if let Some(category) = fields.category {
        input.category_id = Some(category);
    }
    if let Some(publish) = fields.publish {
        input.is_published = publish;
    }
    if let Some(recommended) = fields.recommended {
        input.is_recommended = recommended;
    }
    Ok(input)
}

fn article_input(article: &Article) -> ArticleInput {
    ArticleInput {
        title: article.title.clone(),
        slug: article.slug.clone(),
        content: article.content.clone(),
        content_json: article.content_json.clone(),
        summary: article.summary.clone(),
        cover_image: article.cover_image.clone(),
        category_id: article.category_id,
        is_published: article.is_published,
        is_recommended: article.is_recommended,
    }
}

async fn articles(client: &AdminClient, action: ArticleAction, yes: bool) -> Result<()> {
    let default_query = ArticleQuery {
        page_size: PAGE_SIZE,
        ..Default::default()
    };

    match action {
        ArticleAction::List {
            page,
            category,
            status,
            keyword,
        } => {
            let query = ArticleQuery {
                page: page.max(1),
                page_size: PAGE_SIZE,
                category_id: category,
                status: status.map(Into::into),
                keyword: keyword.filter(|k| !k.is_empty()),
            };
            return list_articles(client, &query).await;
        }
        ArticleAction::Show { id } => {
            let article = client.article(id).await?;
            println!("{}", article.title.bright_white().bold());
            println!("  ID:        {}", article.id);
            println!("  Slug:      {}", article.slug.cyan());
            println!("  Category:  {}", article.category_name);
            println!("  Status:    {}", article.status_label());
            println!("  Featured:  {}", yes_no(article.is_recommended));
            println!("  Views:     {}", article.view_count);
            println!("  Created:   {}", format_date(article.created_at.as_ref()));
            println!("  Updated:   {}", format_date(article.updated_at.as_ref()));
            if !article.summary.is_empty() {
                println!();
                println!("  {}", article.summary);
            }
            println!();
            return Ok(());
        }
        ArticleAction::Create { fields } => {
            let input = apply_fields(ArticleInput::default(), fields)?;
            let id = client.create_article(&input).await?;
            success(&format!("Article created with id {}", id));
        }
        ArticleAction::Update { id, fields } => {
            let current = client.article(id).await?;
            let input = apply_fields(article_input(&current), fields)?;
            let message = client.update_article(id, &input).await?;
            success(&message);
        }
        ArticleAction::Delete { ids } => {
            if !confirm(&format!("Delete {} article(s)?", ids.len()), yes)? {
                return Ok(());
            }
            let message = match ids.as_slice() {
                [id] => client.delete_article(*id).await?,
                _ => client.batch_delete_articles(&ids).await?,
            };
            success(&message);
        }
        ArticleAction::Publish { ids } => {
            let message = client.batch_publish_articles(&ids, true).await?;
            success(&message);
        }
        ArticleAction::Unpublish { ids } => {
            let message = client.batch_publish_articles(&ids, false).await?;
            success(&message);
        }
    }

    list_articles(client, &default_query).await
}

// ---- Categories ----

async fn list_categories(client: &AdminClient) -> Result<()> {
    let categories = client.categories().await?;

    println!("{}", "🗂  Categories".bright_blue().bold());
    println!();
    let mut table = Table::new(["ID", "Name", "Slug", "Order", "Enabled", "Articles"])
        .empty_message("No categories");
    for category in &categories {
        table.row([
            category.id.to_string(),
            category.name.clone(),
            category.slug.clone(),
            category.sort_order.to_string(),
            yes_no(category.is_enabled).to_string(),
            category.article_count.to_string(),
        ]);
    }
    println!("{}", table);
    println!();
    Ok(())
}

async fn categories(client: &AdminClient, action: CategoryAction, yes: bool) -> Result<()> {
    match action {
        CategoryAction::List => return list_categories(client).await,
        CategoryAction::Create {
            name,
            description,
            sort_order,
            disabled,
        } => {
            let input = CategoryInput {
                description,
                sort_order,
                is_enabled: !disabled,
                ..CategoryInput::new(name)
            };
            let id = client.create_category(&input).await?;
            success(&format!("Category created with id {}", id));
        }
        CategoryAction::Update {
            id,
            name,
            description,
            sort_order,
            enabled,
        } => {
            let current = client
                .categories()
                .await?
                .into_iter()
                .find(|c| c.id == id)
                .with_context(|| format!("Category {} not found", id))?;
            let input = CategoryInput {
                name: name.unwrap_or(current.name),
                description: description.unwrap_or(current.description),
                sort_order: sort_order.unwrap_or(current.sort_order),
                is_enabled: enabled.unwrap_or(current.is_enabled),
            };
            let message = client.update_category(id, &input).await?;
            success(&message);
        }
        CategoryAction::Delete { id } => {
            if !confirm(&format!("Delete category {}?", id), yes)? {
                return Ok(());
            }
            let message = client.delete_category(id).await?;
            success(&message);
        }
    }

    list_categories(client).await
}

// ---- Images ----

async fn image_stats(client: &AdminClient) -> Result<()> {
    let stats = client.image_stats().await?;
    println!("{}", "🖼  Images".bright_blue().bold());
    println!();
    println!("  Total:   {}", stats.total_images.to_string().bright_white().bold());
    println!("  Used:    {}", stats.used_images.to_string().green());
    println!("  Unused:  {}", stats.unused_images.to_string().yellow());
    println!("  Size:    {}", format_file_size(stats.total_size));
    println!();
    Ok(())
}

async fn list_images(client: &AdminClient, page: u64, filter: ImageFilter) -> Result<()> {
    let list = client.images(page.max(1), PAGE_SIZE, filter).await?;

    let mut table =
        Table::new(["ID", "File", "Size", "Dimensions", "Used", "Uploaded"]).empty_message("No images found");
    for image in &list.images {
        let dimensions = match (image.width, image.height) {
            (Some(w), Some(h)) => format!("{}x{}", w, h),
            _ => "-".to_string(),
        };
        table.row([
            image.id.to_string(),
            truncate(&image.file_url, 48),
            format_file_size(image.file_size),
            dimensions,
            yes_no(image.is_used).to_string(),
            format_date(image.uploaded_at.as_ref()),
        ]);
    }
    println!("{}", table);
    print_pager(&Pagination::new(list.total, list.page, list.page_size));
    Ok(())
}

async fn images(client: &AdminClient, action: ImageAction, yes: bool) -> Result<()> {
    match action {
        ImageAction::Stats => return image_stats(client).await,
        ImageAction::List { page, filter } => return list_images(client, page, filter.into()).await,
        ImageAction::Upload { files } => {
            for file in &files {
                match client.upload_image(file).await {
                    Ok(image) => println!(
                        "  {} {} → {}",
                        "✔".green(),
                        image.file_name,
                        image.file_url.cyan()
                    ),
                    Err(AdminError::Unauthorized) => return Err(AdminError::Unauthorized.into()),
                    Err(e) => println!("  {} {}: {}", "✘".red(), file.display(), e),
                }
            }
            println!();
        }
        ImageAction::MarkUsed { id } => {
            client.mark_image_used(id).await?;
            success(&format!("Image {} marked as used", id));
        }
        ImageAction::MarkUnused { id } => {
            client.mark_image_unused(id).await?;
            success(&format!("Image {} marked as unused", id));
        }
        ImageAction::Delete { id } => {
            if !confirm(&format!("Delete image {}? The file is removed too.", id), yes)? {
                return Ok(());
            }
            client.delete_image(id).await?;
            success(&format!("Image {} deleted", id));
        }
    }

    list_images(client, 1, ImageFilter::All).await
}

// ---- IP lists ----

async fn list_blacklist(client: &AdminClient) -> Result<()> {
    let entries = client.blacklist().await?;

    println!("{}", "⛔ Blacklist".bright_blue().bold());
    println!();
    let mut table = Table::new(["ID", "IP", "Reason", "Added", "Expires"]).empty_message("No entries");
    for entry in &entries {
        table.row([
            entry.id.to_string(),
            entry.ip_address.clone(),
            truncate(&entry.reason, 40),
            format_date(entry.created_at.as_ref()),
            entry
                .expires_at
                .as_ref()
                .map(|d| format_date(Some(d)))
                .unwrap_or_else(|| "never".to_string()),
        ]);
    }
    println!("{}", table);
    println!();
    Ok(())
}

async fn blacklist(client: &AdminClient, action: BlacklistAction, yes: bool) -> Result<()> {
    match action {
        BlacklistAction::List => return list_blacklist(client).await,
        BlacklistAction::Add { ip, reason, expires } => {
            if let Ok(own_ip) = client.client_ip().await {
                if own_ip == ip {
                    println!("{}", "This is your own IP address.".yellow().bold());
                    if !confirm("Block it anyway?", yes)? {
                        return Ok(());
                    }
                }
            }
            let input = BlacklistInput {
                ip_address: ip,
                reason,
                expires_at: expires.unwrap_or_default(),
            };
            client.add_to_blacklist(&input).await?;
            success(&format!("{} added to blacklist", input.ip_address));
        }
        BlacklistAction::Remove { id } => {
            if !confirm(&format!("Remove blacklist entry {}?", id), yes)? {
                return Ok(());
            }
            let message = client.remove_from_blacklist(id).await?;
            success(&message);
        }
    }

    list_blacklist(client).await
}

async fn list_whitelist(client: &AdminClient) -> Result<()> {
    let entries = client.whitelist().await?;

    println!("{}", "✅ Whitelist".bright_blue().bold());
    println!();
    let mut table = Table::new(["ID", "IP", "Description", "Added"]).empty_message("No entries");
    for entry in &entries {
        table.row([
            entry.id.to_string(),
            entry.ip_address.clone(),
            truncate(&entry.description, 40),
            format_date(entry.created_at.as_ref()),
        ]);
    }
    println!("{}", table);
    println!();
    Ok(())
}

async fn whitelist(client: &AdminClient, action: WhitelistAction, yes: bool) -> Result<()> {
    match action {
        WhitelistAction::List => return list_whitelist(client).await,
        WhitelistAction::Add { ip, description } => {
            let input = WhitelistInput {
                ip_address: ip,
                description,
            };
            client.add_to_whitelist(&input).await?;
            success(&format!("{} added to whitelist", input.ip_address));
        }
        WhitelistAction::Remove { id } => {
            if !confirm(&format!("Remove whitelist entry {}?", id), yes)? {
                return Ok(());
            }
            let message = client.remove_from_whitelist(id).await?;
            success(&message);
        }
    }

    list_whitelist(client).await
}

// ---- Visitors ----

async fn visitors(client: &AdminClient, action: VisitorAction) -> Result<()> {
    match action {
        VisitorAction::Stats => {
            let stats = client.visitor_stats().await?;
            println!("{}", "👥 Visitors".bright_blue().bold());
            println!();
            let mut table = Table::new(["", "PV", "UV", "IPs"]);
            for (label, day) in [("Today", &stats.today), ("Yesterday", &stats.yesterday)] {
                table.row([
                    label.to_string(),
                    day.pv.to_string(),
                    day.uv.to_string(),
                    day.ips.to_string(),
                ]);
            }
            println!("{}", table);
            println!();
            println!("  Online now: {}", stats.realtime_online.to_string().bright_green().bold());
            println!();

            for (name, value) in &stats.breakdowns {
                let Some(rows) = value.as_array() else {
                    continue;
                };
                println!("{}", name.replace('_', " ").bright_white().bold());
                let mut table = Table::new(["Name", "Count"]).empty_message("No data");
                for row in rows.iter().filter_map(|r| r.as_object()) {
                    let label = row
                        .iter()
                        .find(|(_, v)| v.is_string())
                        .and_then(|(_, v)| v.as_str())
                        .unwrap_or("-");
                    let count = row
                        .iter()
                        .find(|(_, v)| v.is_number())
                        .map(|(_, v)| v.to_string())
                        .unwrap_or_default();
                    table.row([truncate(label, 48), count]);
                }
                println!("{}", table);
                println!();
            }
        }
        VisitorAction::List { page, date } => {
            let list = client.visitors(page.max(1), PAGE_SIZE, date.as_deref()).await?;
            let mut table = Table::new([
                "Time", "IP", "Page", "Device", "OS", "Browser", "Location", "Duration", "Views",
            ])
            .empty_message("No data");
            for visit in &list.visitors {
                let location = [visit.city.as_str(), visit.country.as_str()]
                    .iter()
                    .filter(|s| !s.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", ");
                table.row([
                    visit.visit_time.clone().unwrap_or_else(|| "-".to_string()),
                    visit.ip.clone(),
                    truncate(&visit.page, 32),
                    visit.device.clone(),
                    visit.os.clone(),
                    visit.browser.clone(),
                    location,
                    format!("{}s", visit.duration),
                    visit.page_view_count.to_string(),
                ]);
            }
            println!("{}", table);
            print_pager(&Pagination::new(list.page.total, list.page.page, list.page.page_size));
        }
        VisitorAction::Trend { days } => {
            let trend = client.visitor_trend(days).await?;
            let mut table = Table::new(["Date", "PV", "UV", "IPs"]).empty_message("No data");
            for point in &trend {
                table.row([
                    point.date.clone(),
                    point.pv.to_string(),
                    point.uv.to_string(),
                    point.ips.to_string(),
                ]);
            }
            println!("{}", table);
            println!();
        }
    }
    Ok(())
}

// ---- System ----

async fn system(client: &AdminClient, action: SystemAction, yes: bool) -> Result<()> {
    match action {
        SystemAction::Info => {
            let info = client.system_info().await?;
            println!("{}", "ℹ️  System".bright_blue().bold());
            println!();
            println!("  Visitor records: {}", info.total_visitors);
            println!("  Articles:        {}", info.total_articles);
            println!("  Images:          {}", info.total_images);
            println!("  Database size:   {}", info.db_size);
            println!();
        }
        SystemAction::ClientIp => {
            println!("{}", client.client_ip().await?.cyan());
        }
        SystemAction::ClearVisitors => {
            println!("{}", "This deletes every visitor record.".red().bold());
            if !confirm("Clear all visitor records?", yes)? {
                return Ok(());
            }
            let message = client.clear_visitors().await?;
            success(&message);
        }
        SystemAction::ClearStats => {
            if !confirm("Clear daily statistics?", yes)? {
                return Ok(());
            }
            let message = client.clear_stats().await?;
            success(&message);
        }
    }
    Ok(())
}
