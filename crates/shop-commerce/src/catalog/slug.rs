//! Slug derivation and allocation.
//!
//! A slug is a URL-safe, human-readable alternative to a product's opaque
//! id. Uniqueness is checked against the product collection before a slug
//! is attached.
//!
//! The check and the later create are separate store calls, so two admins
//! submitting at the same moment can both see a slug as free and both
//! persist it. Closing that gap needs a unique index in the store itself.

use crate::CommerceError;
use crate::validation::ValidationErrors;
use shop_store::{DocumentStore, Query, PRODUCTS};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Numbered candidates tried before falling back to a timestamp suffix.
pub const MAX_SLUG_ATTEMPTS: usize = 12;

/// Derive a URL-safe slug from free text.
///
/// Strips diacritics, keeps `[a-z0-9]`, turns whitespace and hyphen runs
/// into single hyphens and trims hyphens at both ends. An empty result
/// means the title has no usable slug.
///
/// ```
/// use shop_commerce::catalog::slugify;
///
/// assert_eq!(slugify("  Café Latte!! "), "cafe-latte");
/// assert_eq!(slugify("মধু"), "");
/// ```
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
    {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    out
}

/// Outcome of checking a slug typed into a form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlugStatus {
    /// Nothing usable was typed.
    #[default]
    Empty,
    Available(String),
    Taken(String),
}

/// Allocates unique product slugs against the store.
#[derive(Clone)]
pub struct SlugAllocator {
    store: Arc<dyn DocumentStore>,
    max_attempts: usize,
}

impl SlugAllocator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            max_attempts: MAX_SLUG_ATTEMPTS,
        }
    }

    /// Check whether any product already uses `candidate`.
    ///
    /// Fails closed: a store error reports the slug as taken.
    pub async fn check_exists(&self, candidate: &str) -> bool {
        let query = Query::new().where_eq("slug", candidate).limit(1);
        match self.store.query(PRODUCTS, &query).await {
            Ok(docs) => !docs.is_empty(),
            Err(e) => {
                tracing::warn!(candidate, error = %e, "slug lookup failed, treating as taken");
                true
            }
        }
    }

    /// Suggest a free slug for a title.
    ///
    /// Tries `base`, `base-1`, ... for at most [`MAX_SLUG_ATTEMPTS`] lookups,
    /// then returns `base-<timestamp suffix>` without another lookup. Returns
    /// an empty string when the title has no usable slug.
    pub async fn suggest(&self, title: &str) -> String {
        let base = slugify(title);
        if base.is_empty() {
            return base;
        }

        for attempt in 0..self.max_attempts {
            let candidate = numbered(&base, attempt);
            if !self.check_exists(&candidate).await {
                return candidate;
            }
        }

        let fallback = format!("{}-{}", base, timestamp_suffix());
        tracing::info!(base = %base, slug = %fallback, "numbered slugs exhausted, using timestamp suffix");
        fallback
    }

    /// Validate a slug typed by an admin.
    ///
    /// The input is normalized with [`slugify`] first.
    pub async fn claim(&self, requested: &str) -> Result<String, CommerceError> {
        match self.status(requested).await {
            SlugStatus::Available(slug) => Ok(slug),
            SlugStatus::Taken(slug) => Err(CommerceError::SlugTaken(slug)),
            SlugStatus::Empty => {
                let mut errors = ValidationErrors::new();
                errors.add("slug", "Slug must contain letters or digits");
                Err(errors.into())
            }
        }
    }

    /// Normalize and check typed input.
    pub async fn status(&self, input: &str) -> SlugStatus {
        let slug = slugify(input);
        if slug.is_empty() {
            SlugStatus::Empty
        } else if self.check_exists(&slug).await {
            SlugStatus::Taken(slug)
        } else {
            SlugStatus::Available(slug)
        }
    }
}

fn numbered(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

/// Base-36 milliseconds plus two random base-36 digits.
fn timestamp_suffix() -> String {
    use rand::Rng;

    let mut n = crate::now_millis().max(0) as u64;
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(base36_digit((n % 36) as u32));
        n /= 36;
    }
    digits.reverse();

    let mut rng = rand::thread_rng();
    for _ in 0..2 {
        digits.push(base36_digit(rng.gen_range(0..36)));
    }
    digits.into_iter().collect()
}

fn base36_digit(d: u32) -> char {
    std::char::from_digit(d, 36).unwrap_or('0')
}

/// A monotonically increasing token for one slug check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlugTicket(u64);

/// Decides which slug check results may still be shown.
///
/// Only the most recently issued ticket is current, and nothing is current
/// once the gate is closed.
#[derive(Debug, Default)]
pub struct SlugCheckGate {
    latest: AtomicU64,
    closed: AtomicBool,
}

impl SlugCheckGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new check, superseding every earlier ticket.
    pub fn issue(&self) -> SlugTicket {
        SlugTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SlugTicket) -> bool {
        !self.closed.load(Ordering::SeqCst) && self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Stop accepting results, e.g. when the form is closed.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// The slug input of an open product form.
///
/// Each keystroke starts a debounced check; a result is applied only if no
/// newer check started meanwhile and the form is still open.
#[derive(Debug)]
pub struct SlugField {
    gate: SlugCheckGate,
    status: Mutex<SlugStatus>,
    debounce: Duration,
}

impl SlugField {
    pub fn new(debounce: Duration) -> Self {
        Self {
            gate: SlugCheckGate::new(),
            status: Mutex::new(SlugStatus::Empty),
            debounce,
        }
    }

    /// Status from the latest applied check.
    pub fn status(&self) -> SlugStatus {
        self.status.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Start a check without running it.
    pub fn begin(&self) -> SlugTicket {
        self.gate.issue()
    }

    /// Apply a finished check. Returns false if the result was stale.
    pub fn apply(&self, ticket: SlugTicket, status: SlugStatus) -> bool {
        if !self.gate.is_current(ticket) {
            return false;
        }
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) = status;
        true
    }

    /// Debounce, check and apply. `None` if superseded or closed.
    pub async fn check(&self, allocator: &SlugAllocator, input: &str) -> Option<SlugStatus> {
        let ticket = self.begin();

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
            if !self.gate.is_current(ticket) {
                return None;
            }
        }

        let status = allocator.status(input).await;
        if self.apply(ticket, status.clone()) {
            Some(status)
        } else {
            tracing::debug!(input, "discarding stale slug check");
            None
        }
    }

    /// Close the form; in-flight checks become no-ops.
    pub fn close(&self) {
        self.gate.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BrokenStore, FlakyStore};
    use serde_json::json;
    use shop_store::{DocumentStore, InMemoryStore};

    async fn store_with_slugs(slugs: &[&str]) -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        for slug in slugs {
            let fields = json!({ "slug": slug }).as_object().cloned().unwrap();
            store.create(PRODUCTS, fields).await.unwrap();
        }
        store
    }

    #[test]
    fn test_slugify_examples() {
        assert_eq!(slugify("  Café Latte!! "), "cafe-latte");
        assert_eq!(slugify("Crème   Brûlée -- Deluxe"), "creme-brulee-deluxe");
        assert_eq!(slugify("---Hello---World---"), "hello-world");
        assert_eq!(slugify("Honey 500g"), "honey-500g");
        assert_eq!(slugify("a!b"), "ab");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("খাঁটি মধু"), "");
    }

    #[test]
    fn test_slugify_idempotent_and_alphabet() {
        let inputs = [
            "  Café Latte!! ",
            "ÀÉÎÕÜ ñ ç",
            "Mixed_Case-Title  2024",
            "   ",
            "-a-",
            "Tab\tand\nnewline",
            "ℌello ﬁne",
            "Ünïcödé -- ---",
        ];
        for input in inputs {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {input:?}");
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            assert!(!once.starts_with('-') && !once.ends_with('-'));
            assert!(!once.contains("--"));
        }
    }

    #[tokio::test]
    async fn test_check_exists() {
        let store = store_with_slugs(&["raw-honey"]).await;
        let slugs = SlugAllocator::new(store);
        assert!(slugs.check_exists("raw-honey").await);
        assert!(!slugs.check_exists("ghee").await);
    }

    #[tokio::test]
    async fn test_check_exists_fails_closed() {
        let slugs = SlugAllocator::new(Arc::new(BrokenStore));
        assert!(slugs.check_exists("anything").await);
    }

    #[tokio::test]
    async fn test_suggest_skips_taken_candidates() {
        let store = store_with_slugs(&["raw-honey", "raw-honey-1", "raw-honey-2"]).await;
        let slugs = SlugAllocator::new(store.clone());

        let suggestion = slugs.suggest("Raw Honey").await;
        assert_eq!(suggestion, "raw-honey-3");
        assert!(!slugs.check_exists(&suggestion).await);
    }

    #[tokio::test]
    async fn test_suggest_free_base() {
        let slugs = SlugAllocator::new(store_with_slugs(&[]).await);
        assert_eq!(slugs.suggest("Raw Honey").await, "raw-honey");
    }

    #[tokio::test]
    async fn test_suggest_empty_title_makes_no_queries() {
        let store = Arc::new(FlakyStore::default());
        let slugs = SlugAllocator::new(store.clone());
        assert_eq!(slugs.suggest("!!!").await, "");
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn test_suggest_terminates_when_lookups_always_fail() {
        let slugs = SlugAllocator::new(Arc::new(BrokenStore));
        let suggestion = slugs.suggest("Widget").await;

        let suffix = suggestion.strip_prefix("widget-").unwrap();
        assert!(suffix.len() >= 3);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_suggest_bounded_lookups() {
        let store = Arc::new(FlakyStore::default());
        for i in 0..MAX_SLUG_ATTEMPTS {
            let slug = numbered("widget", i);
            let fields = json!({ "slug": slug }).as_object().cloned().unwrap();
            store.create(PRODUCTS, fields).await.unwrap();
        }
        let slugs = SlugAllocator::new(store.clone());

        let suggestion = slugs.suggest("Widget").await;
        assert!(suggestion.starts_with("widget-"));
        assert!(!slugs.check_exists(&suggestion).await);
        // 12 suggest lookups plus the assertion above
        assert_eq!(store.query_count(), MAX_SLUG_ATTEMPTS + 1);
    }

    #[tokio::test]
    async fn test_claim() {
        let slugs = SlugAllocator::new(store_with_slugs(&["ghee"]).await);
        assert_eq!(slugs.claim("Pure Ghee").await.unwrap(), "pure-ghee");
        assert!(matches!(
            slugs.claim("GHEE").await,
            Err(CommerceError::SlugTaken(s)) if s == "ghee"
        ));
        assert!(matches!(
            slugs.claim("???").await,
            Err(CommerceError::Validation(_))
        ));
    }

    #[test]
    fn test_gate_only_latest_ticket_applies() {
        let field = SlugField::new(Duration::ZERO);
        let first = field.begin();
        let second = field.begin();

        assert!(!field.apply(first, SlugStatus::Taken("old".into())));
        assert!(field.apply(second, SlugStatus::Available("new".into())));
        assert_eq!(field.status(), SlugStatus::Available("new".into()));
    }

    #[test]
    fn test_closed_field_ignores_results() {
        let field = SlugField::new(Duration::ZERO);
        let ticket = field.begin();
        field.close();
        assert!(!field.apply(ticket, SlugStatus::Available("late".into())));
        assert_eq!(field.status(), SlugStatus::Empty);
    }

    #[tokio::test]
    async fn test_debounced_check_drops_superseded_input() {
        let store = Arc::new(FlakyStore::default());
        let slugs = SlugAllocator::new(store.clone());
        let field = SlugField::new(Duration::from_millis(20));

        let (first, second) = tokio::join!(field.check(&slugs, "hon"), field.check(&slugs, "honey"));

        assert_eq!(first, None);
        assert_eq!(second, Some(SlugStatus::Available("honey".into())));
        assert_eq!(store.query_count(), 1);
    }
}
