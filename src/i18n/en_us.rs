// ============================================================================
// LocaleSync - English Translation Table
// ============================================================================
//
// 文件: src/i18n/en_us.rs
// 职责: English translation content definition
// 边界:
//   - ✅ English translation strings definition
//   - ❌ Should not contain translation logic
//   - ❌ Should not contain other language translations
//
// ============================================================================

/// English translation table
pub const TRANSLATIONS: &[(&str, &str)] = &[
    // Sync
    ("sync.start", "Starting sync ({})..."),
    ("sync.fetching", "Reading sheets from spreadsheet {}"),
    ("sync.reading_files", "Reading locale files from {} ({} layout)"),
    ("sync.dry_run", "Dry run: nothing will be written"),
    ("sync.missing_settings", "Missing required settings: {}"),
    ("sync.progress_fetch", "Fetching sheets"),
    ("sync.progress_update", "Updating sheets"),
    ("sync.failed", "Sync failed: {}"),
    // Auth
    ("auth.start", "Starting Google OAuth authorization..."),
    ("auth.open_url", "Open this URL in your browser to authorize:"),
    ("auth.waiting", "Waiting for the authorization callback on port {}..."),
    (
        "auth.paste_code",
        "After approving, copy the code parameter and run: locale-sync auth --code <CODE>",
    ),
    ("auth.exchanging", "Exchanging authorization code for a token..."),
    ("auth.token_saved", "Token saved to {}"),
    (
        "auth.no_refresh_token",
        "No refresh token was returned; you will need to authorize again when the token expires",
    ),
    // Init
    ("init.start", "Initializing configuration file..."),
    ("init.config_exists", "Configuration file already exists: {}"),
    ("init.use_force_hint", "Use --force to overwrite it"),
    ("init.config_created", "Configuration file created: {}"),
    (
        "init.next_steps",
        "Next: set sheet.id and sheet.credentials, then run `locale-sync auth`",
    ),
    ("init.create_failed", "Failed to create configuration file: {}"),
    // Summary
    ("summary.title", "Sync Summary"),
    ("summary.direction", "Direction: {}"),
    ("summary.categories", "Categories: {}"),
    ("summary.languages", "Languages: {}"),
    ("summary.rows", "Rows: {}"),
    ("summary.files_written", "Files written: {}"),
    ("summary.files_planned", "Files to write: {}"),
    ("summary.sheets_written", "Sheets updated: {}"),
    ("summary.sheets_planned", "Sheets to update: {}"),
    ("summary.warnings", "Warnings: {}"),
    ("summary.notices", "Notices: {}"),
    ("summary.duration", "Duration: {}s"),
    ("summary.nothing", "Nothing to sync"),
    ("summary.warning_details", "Warning details"),
    ("summary.category_line", "{}: {} rows, {}"),
];
