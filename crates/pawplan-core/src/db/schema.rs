//! Canonical SQLite schema for the tracker store.
//!
//! Four tables mirror the logical partitions of the backing document
//! store: `owners`, `pets`, and task storage split into `pending_tasks`
//! and `completed_tasks`. The two task tables are shape-identical; which
//! one holds a record *is* the record's state, so neither carries a
//! completed column.
//!
//! The task tables carry no foreign key into `pets`: the collections are
//! independent, and pet deletion cascades at the repository level so that
//! partial failures can be counted and reported instead of hidden.

/// Migration v1: owners, pets, and the two task partitions.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS owners (
    owner_id TEXT PRIMARY KEY,
    display_name TEXT,
    email TEXT,
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS pets (
    pet_id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL REFERENCES owners(owner_id),
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    breed TEXT NOT NULL CHECK (length(trim(breed)) > 0),
    age REAL NOT NULL CHECK (age >= 0),
    weight REAL NOT NULL CHECK (weight >= 0),
    species TEXT NOT NULL CHECK (species IN ('dog', 'cat', 'bird', 'other')),
    avatar_color TEXT NOT NULL,
    photo TEXT,
    CHECK (pet_id LIKE 'pet-%')
);

CREATE TABLE IF NOT EXISTS pending_tasks (
    task_id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL,
    owner_id TEXT NOT NULL,
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    time TEXT NOT NULL,
    date TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('food', 'walk', 'medication', 'play', 'grooming')),
    CHECK (task_id LIKE 'tsk-%')
);

CREATE TABLE IF NOT EXISTS completed_tasks (
    task_id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL,
    owner_id TEXT NOT NULL,
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    time TEXT NOT NULL,
    date TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('food', 'walk', 'medication', 'play', 'grooming')),
    CHECK (task_id LIKE 'tsk-%')
);
";

/// Migration v2: read-path indexes for the documented query shapes.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_pets_owner
    ON pets(owner_id, name);

CREATE INDEX IF NOT EXISTS idx_pending_tasks_pet_owner
    ON pending_tasks(pet_id, owner_id);

CREATE INDEX IF NOT EXISTS idx_pending_tasks_owner_date
    ON pending_tasks(owner_id, date);

CREATE INDEX IF NOT EXISTS idx_completed_tasks_pet_owner
    ON completed_tasks(pet_id, owner_id);

CREATE INDEX IF NOT EXISTS idx_completed_tasks_owner_date
    ON completed_tasks(owner_id, date);
";

/// Indexes every migrated database must carry.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_pets_owner",
    "idx_pending_tasks_pet_owner",
    "idx_pending_tasks_owner_date",
    "idx_completed_tasks_pet_owner",
    "idx_completed_tasks_owner_date",
];
