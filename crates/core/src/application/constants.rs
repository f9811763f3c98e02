// Deploy constants (no magic values)

/// Process status for any failed run
pub const FAILURE_EXIT_CODE: u8 = 1;

/// Default console tag
pub const DEFAULT_TAG: &str = "[v0]";

/// Default project directory the steps run in
pub const DEFAULT_WORKING_DIR: &str = "/vercel/share/v0-project";

/// Step A default: install the migration tool package
pub const DEFAULT_INSTALL_PROGRAM: &str = "python3";
pub const DEFAULT_INSTALL_ARGS: &[&str] = &["-m", "pip", "install", "prisma"];

/// Step B default: apply pending migrations
pub const DEFAULT_MIGRATE_PROGRAM: &str = "npx";
pub const DEFAULT_MIGRATE_ARGS: &[&str] = &["prisma", "migrate", "deploy"];

// Console messages (prefixed with the tag)
pub const MSG_START: &str = "Running Prisma database migration...";
pub const MSG_INSTALL_RESULT: &str = "Prisma install result:";
pub const MSG_MIGRATE_STDOUT: &str = "Migration stdout:";
pub const MSG_MIGRATE_STDERR: &str = "Migration stderr:";
pub const MSG_MIGRATE_RESULT: &str = "Migration result code:";
pub const MSG_SUCCESS: &str = "Migration completed successfully!";
pub const MSG_FAILURE: &str = "Migration failed with return code:";
