//! Command handlers for the Rockflint CLI.
//!
//! `App` owns the configuration and the signed-in session; each command
//! maps to one method that talks to the API and prints plain text.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use rockflint_core::api::{ApiError, ListingFilters};
use rockflint_core::auth::{CredentialStore, SignIn};
use rockflint_core::models::{average_rating, Listing};
use rockflint_core::utils::{format_date, format_price, format_rating, truncate_string};
use rockflint_core::{ApiClient, AuthSession, ClientConfig, Config, TokenStore};

use crate::commands::Commands;

/// Width of the title column in listing tables.
const TITLE_WIDTH: usize = 40;

/// Maximum number of reviews shown under a listing.
const MAX_REVIEWS_SHOWN: usize = 5;

pub struct App {
    config: Config,
    session: AuthSession,
    credentials: CredentialStore,
}

impl App {
    pub fn new(client_config: &ClientConfig) -> Result<Self> {
        let config = Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        });

        let store = TokenStore::open(&client_config.state_dir)
            .context("Failed to open credential state")?;
        let api = ApiClient::new(client_config, Arc::new(store))
            .context("Failed to create API client")?;

        Ok(Self {
            config,
            session: AuthSession::new(api),
            credentials: CredentialStore::new(&client_config.base_url),
        })
    }

    fn api(&self) -> &ApiClient {
        self.session.api()
    }

    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Login { email, remember } => self.login(email, remember).await,
            Commands::Logout => self.logout(),
            Commands::Whoami => self.whoami().await,
            Commands::Listings {
                search,
                min_price,
                max_price,
                bedrooms,
                category,
                state,
                ordering,
                page,
            } => {
                let filters = ListingFilters {
                    search,
                    min_price,
                    max_price,
                    bedrooms,
                    category,
                    state,
                    ordering,
                    page,
                    ..Default::default()
                };
                self.listings(&filters).await
            }
            Commands::Listing { id } => self.listing(id).await,
            Commands::Favorite { id } => self.favorite(id).await,
            Commands::Wishlist => self.wishlist().await,
            Commands::Vendors => self.vendors().await,
            Commands::Dashboard { vendor_id } => self.dashboard(vendor_id).await,
            Commands::Categories => self.categories().await,
            Commands::Chat { message } => self.chat(&message).await,
        }
    }

    // ===== Account =====

    async fn login(&mut self, email: Option<String>, remember: bool) -> Result<()> {
        let email = match email.or_else(|| self.config.last_email.clone()) {
            Some(email) => email,
            None => Self::prompt("Email: ")?,
        };
        if email.is_empty() {
            anyhow::bail!("Email required");
        }

        let remembered = self.credentials.password(&email).unwrap_or_else(|e| {
            warn!(error = %e, "Keychain unavailable");
            None
        });
        let mut stored = remembered.is_some();
        let mut password = match remembered {
            Some(password) => {
                debug!("Using password from keychain");
                password
            }
            None => rpassword::prompt_password("Password: ")?,
        };

        let outcome = match self.session.sign_in(&email, &password, remember).await {
            Err(e) if stored && is_status(&e, 400) => {
                // Stale keychain entry: forget it and ask once
                self.credentials.forget(&email)?;
                stored = false;
                password = rpassword::prompt_password("Password: ")?;
                self.session.sign_in(&email, &password, remember).await?
            }
            other => other?,
        };

        if let SignIn::OtpRequired(challenge) = outcome {
            let code = Self::prompt("One-time code: ")?;
            self.session.verify_otp(&challenge, &code).await?;
        }

        if remember && !stored {
            if let Err(e) = self.credentials.remember(&email, &password) {
                warn!(error = %e, "Failed to store credentials");
            }
        }

        self.config.last_email = Some(email);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        match self.session.load_profile().await {
            Ok(user) => println!("Signed in as {}", user.display_name()),
            Err(e) => {
                warn!(error = %e, "Signed in but failed to load profile");
                println!("Signed in");
            }
        }
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.session.sign_out();
        if let Some(ref email) = self.config.last_email {
            self.credentials.forget(email)?;
        }
        println!("Signed out");
        Ok(())
    }

    async fn whoami(&self) -> Result<()> {
        if !self.session.is_authenticated() {
            println!("Not signed in");
            return Ok(());
        }
        match self.session.load_profile().await {
            Ok(user) => {
                println!("{}", user.display_name());
                if let Some(ref email) = user.email {
                    println!("  {}", email);
                }
                Ok(())
            }
            Err(e) if is_status(&e, 401) => {
                println!("Session expired, run `rockflint login`");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    // ===== Listings =====

    async fn listings(&self, filters: &ListingFilters) -> Result<()> {
        let page = self
            .api()
            .fetch_listings(filters)
            .await
            .map_err(friendly)?;

        println!("{} listings", page.count);
        for listing in &page.results {
            print_listing_row(listing);
        }
        if page.has_next() {
            let next = filters.page.unwrap_or(1) + 1;
            println!("... more results with --page {}", next);
        }
        Ok(())
    }

    async fn listing(&self, id: i64) -> Result<()> {
        let api = self.api();
        let (listing, reviews, similar) = futures::try_join!(
            api.fetch_listing(id),
            api.fetch_listing_reviews(id),
            api.fetch_recommendations(id),
        )
        .map_err(friendly)?;

        println!("{}", listing.title);
        println!("  {}", format_price(listing.price));
        let rooms = listing.rooms_summary();
        if !rooms.is_empty() {
            println!("  {}", rooms);
        }
        if let Some(ref address) = listing.address {
            println!("  {}", address);
        }
        if let Some((lat, lng)) = listing.coordinates() {
            println!("  at {:.5}, {:.5}", lat, lng);
        }
        if let Some(image) = listing.cover_image() {
            println!("  {}", image);
        }
        if !listing.features.is_empty() {
            let names: Vec<&str> = listing.features.iter().map(|f| f.name.as_str()).collect();
            println!("  Features: {}", names.join(", "));
        }
        if let Some(ref description) = listing.description {
            println!("\n{}", description);
        }

        println!("\nReviews ({})", format_rating(average_rating(&reviews)));
        for review in reviews.iter().take(MAX_REVIEWS_SHOWN) {
            println!(
                "  {}/5 {} - {} ({})",
                review.rating,
                review.title,
                review.user,
                format_date(&review.created)
            );
        }

        if !similar.is_empty() {
            println!("\nSimilar listings");
            for listing in &similar {
                print_listing_row(listing);
            }
        }
        Ok(())
    }

    async fn favorite(&self, id: i64) -> Result<()> {
        self.require_session()?;
        let toggle = self.api().toggle_favorite(id).await.map_err(friendly)?;
        if toggle.favorited {
            println!("Saved listing {}", id);
        } else {
            println!("Removed listing {} from favorites", id);
        }
        Ok(())
    }

    async fn wishlist(&self) -> Result<()> {
        self.require_session()?;
        let favorites = self.api().fetch_wishlist().await.map_err(friendly)?;
        if favorites.is_empty() {
            println!("No saved listings");
        }
        for fav in &favorites {
            let status = if fav.listing.active { "" } else { " (inactive)" };
            println!(
                "{:>6}  {:<width$}  {:>14}  saved {}{}",
                fav.listing.id,
                truncate_string(&fav.listing.title, TITLE_WIDTH),
                format_price(fav.listing.price),
                format_date(&fav.saved_at),
                status,
                width = TITLE_WIDTH
            );
        }
        Ok(())
    }

    // ===== Vendors =====

    async fn vendors(&self) -> Result<()> {
        let vendors = self.api().fetch_vendors().await.map_err(friendly)?;
        for vendor in &vendors {
            let badge = if vendor.verified { " [verified]" } else { "" };
            println!("{:>6}  {}{}", vendor.id, vendor.display_name(), badge);
            if let Some(ref phone) = vendor.phone_number {
                println!("        {}", phone);
            }
        }
        Ok(())
    }

    async fn dashboard(&self, vendor_id: i64) -> Result<()> {
        self.require_session()?;
        let dashboard = self
            .api()
            .fetch_vendor_dashboard(vendor_id)
            .await
            .map_err(friendly)?;

        println!("{}", dashboard.vendor.display_name());
        println!(
            "  Listings: {} ({} active, {} inactive)",
            dashboard.total_listings, dashboard.active_listings, dashboard.inactive_listings
        );
        println!(
            "  Reviews: {} ({})",
            dashboard.total_reviews,
            format_rating(Some(dashboard.average_rating).filter(|_| dashboard.total_reviews > 0))
        );
        println!("  Favorites: {}", dashboard.total_favorites);

        if !dashboard.activities.is_empty() {
            println!("\nRecent activity");
            for activity in &dashboard.activities {
                println!("  {}  {}", format_date(&activity.created), activity.summary);
            }
        }
        Ok(())
    }

    // ===== Misc =====

    async fn categories(&self) -> Result<()> {
        let categories = self.api().fetch_categories().await.map_err(friendly)?;
        for category in &categories {
            println!("{:>4}  {} ({})", category.id, category.name, category.slug);
        }
        Ok(())
    }

    async fn chat(&self, message: &str) -> Result<()> {
        self.require_session()?;
        let reply = self.api().send_chat_message(message).await.map_err(friendly)?;
        match reply.get("reply").and_then(|r| r.as_str()) {
            Some(text) => println!("{}", text),
            None => println!("{}", serde_json::to_string_pretty(&reply)?),
        }
        Ok(())
    }

    fn require_session(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            anyhow::bail!("Not signed in, run `rockflint login` first")
        }
    }

    fn prompt(label: &str) -> Result<String> {
        print!("{}", label);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}

fn print_listing_row(listing: &Listing) {
    println!(
        "{:>6}  {:<width$}  {:>14}  {}",
        listing.id,
        truncate_string(&listing.title, TITLE_WIDTH),
        format_price(listing.price),
        listing.rooms_summary(),
        width = TITLE_WIDTH
    );
}

/// Turn an `ApiError` into a readable message, keeping a hint for the
/// session-expired case.
fn friendly(err: ApiError) -> anyhow::Error {
    if err.is_unauthorized() {
        anyhow::anyhow!("{} (run `rockflint login`)", err.message())
    } else {
        anyhow::anyhow!(err.message())
    }
}

fn is_status(err: &anyhow::Error, status: u16) -> bool {
    err.downcast_ref::<ApiError>()
        .and_then(ApiError::status)
        == Some(status)
}
