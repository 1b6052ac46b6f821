//! Schema definitions for the reservation database.
//!
//! All tables are defined here, in foreign-key dependency order: a table
//! appears only after every table it references. Each statement uses
//! `CREATE TABLE IF NOT EXISTS`, so re-applying the full list is safe.

/// Current schema version
/// Increment this when making breaking schema changes
pub const SCHEMA_VERSION: u32 = 1;

/// Names of all tables, in the same order as [`SchemaDefinitions::ordered_statements`]
pub const TABLE_NAMES: &[&str] = &[
    "staydb_meta",
    "users",
    "properties",
    "property_photos",
    "amenities",
    "property_amenities",
    "rooms",
    "reservations",
    "user_favorites",
    "reviews",
    "notification_settings",
    "notification_logs",
];

/// Schema definitions for all tables in the reservation database
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// SQL for creating the meta table (tracks schema version and global metadata)
    pub const META_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS staydb_meta (
            meta_key VARCHAR(64) PRIMARY KEY,
            meta_value VARCHAR(255) NOT NULL,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// SQL for creating the users table (account + LINE notification identity)
    pub const USERS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            email VARCHAR(255) NOT NULL UNIQUE,
            name VARCHAR(100) NOT NULL,
            auth_provider VARCHAR(50),
            auth_provider_id VARCHAR(255),
            line_user_id VARCHAR(255) UNIQUE,
            line_notification_enabled BOOLEAN DEFAULT TRUE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            INDEX idx_email (email),
            INDEX idx_line_user (line_user_id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// SQL for creating the properties table, owned by a user
    pub const PROPERTIES_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS properties (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            owner_id BIGINT UNSIGNED NOT NULL,
            name VARCHAR(255) NOT NULL,
            description TEXT,
            address TEXT NOT NULL,
            latitude DECIMAL(10, 8),
            longitude DECIMAL(11, 8),
            is_active BOOLEAN DEFAULT TRUE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            FOREIGN KEY (owner_id) REFERENCES users(id),
            INDEX idx_owner (owner_id),
            INDEX idx_location (latitude, longitude)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// SQL for creating the property photos table (inline blob or URL)
    pub const PROPERTY_PHOTOS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS property_photos (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            property_id BIGINT UNSIGNED NOT NULL,
            photo_data MEDIUMBLOB,
            photo_url VARCHAR(255),
            content_type VARCHAR(100),
            file_size INT UNSIGNED,
            display_order SMALLINT UNSIGNED NOT NULL DEFAULT 0,
            is_main BOOLEAN DEFAULT FALSE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (property_id) REFERENCES properties(id),
            INDEX idx_property_order (property_id, display_order)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// SQL for creating the amenities catalog table
    pub const AMENITIES_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS amenities (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            icon VARCHAR(255),
            category VARCHAR(50),
            is_active BOOLEAN DEFAULT TRUE,
            INDEX idx_category (category)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// SQL for creating the property-amenity join table
    pub const PROPERTY_AMENITIES_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS property_amenities (
            property_id BIGINT UNSIGNED NOT NULL,
            amenity_id BIGINT UNSIGNED NOT NULL,
            description TEXT,
            PRIMARY KEY (property_id, amenity_id),
            FOREIGN KEY (property_id) REFERENCES properties(id),
            FOREIGN KEY (amenity_id) REFERENCES amenities(id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// SQL for creating the rooms table, the bookable unit of a property
    pub const ROOMS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS rooms (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            property_id BIGINT UNSIGNED NOT NULL,
            name VARCHAR(255) NOT NULL,
            description TEXT,
            capacity SMALLINT UNSIGNED NOT NULL,
            price_per_night DECIMAL(10, 2) NOT NULL,
            is_active BOOLEAN DEFAULT TRUE,
            FOREIGN KEY (property_id) REFERENCES properties(id),
            INDEX idx_property (property_id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// SQL for creating the reservations table
    pub const RESERVATIONS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            room_id BIGINT UNSIGNED NOT NULL,
            user_id BIGINT UNSIGNED NOT NULL,
            check_in DATE NOT NULL,
            check_out DATE NOT NULL,
            total_price DECIMAL(10, 2) NOT NULL,
            status ENUM('pending', 'confirmed', 'checked_in', 'checked_out', 'cancelled') NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (room_id) REFERENCES rooms(id),
            FOREIGN KEY (user_id) REFERENCES users(id),
            INDEX idx_room_dates (room_id, check_in, check_out),
            INDEX idx_user (user_id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// SQL for creating the user favorites join table
    pub const USER_FAVORITES_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS user_favorites (
            user_id BIGINT UNSIGNED NOT NULL,
            property_id BIGINT UNSIGNED NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (user_id, property_id),
            FOREIGN KEY (user_id) REFERENCES users(id),
            FOREIGN KEY (property_id) REFERENCES properties(id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// SQL for creating the reviews table (one review per reservation, rating 1-5)
    pub const REVIEWS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            property_id BIGINT UNSIGNED NOT NULL,
            user_id BIGINT UNSIGNED NOT NULL,
            reservation_id BIGINT UNSIGNED NOT NULL,
            rating TINYINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comment TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (property_id) REFERENCES properties(id),
            FOREIGN KEY (user_id) REFERENCES users(id),
            FOREIGN KEY (reservation_id) REFERENCES reservations(id),
            UNIQUE KEY uniq_reservation_review (reservation_id),
            INDEX idx_property_rating (property_id, rating)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// SQL for creating the per-user notification settings table
    pub const NOTIFICATION_SETTINGS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS notification_settings (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            user_id BIGINT UNSIGNED NOT NULL,
            notification_type ENUM('reservation_confirmed', 'check_in_reminder', 'check_out_reminder', 'reservation_cancelled') NOT NULL,
            is_enabled BOOLEAN DEFAULT TRUE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
            FOREIGN KEY (user_id) REFERENCES users(id),
            UNIQUE KEY uniq_user_notification (user_id, notification_type)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// SQL for creating the notification delivery log table
    pub const NOTIFICATION_LOGS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS notification_logs (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            user_id BIGINT UNSIGNED NOT NULL,
            reservation_id BIGINT UNSIGNED,
            notification_type ENUM('reservation_confirmed', 'check_in_reminder', 'check_out_reminder', 'reservation_cancelled') NOT NULL,
            status ENUM('success', 'failed') NOT NULL,
            error_message TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (user_id) REFERENCES users(id),
            FOREIGN KEY (reservation_id) REFERENCES reservations(id),
            INDEX idx_user_notification (user_id, notification_type),
            INDEX idx_reservation (reservation_id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
    "#;

    /// All table-creation statements in foreign-key dependency order.
    ///
    /// The order is load-bearing: MySQL rejects a foreign key whose
    /// target table does not exist yet.
    pub fn ordered_statements() -> &'static [&'static str] {
        &[
            Self::META_TABLE,
            Self::USERS_TABLE,
            Self::PROPERTIES_TABLE,
            Self::PROPERTY_PHOTOS_TABLE,
            Self::AMENITIES_TABLE,
            Self::PROPERTY_AMENITIES_TABLE,
            Self::ROOMS_TABLE,
            Self::RESERVATIONS_TABLE,
            Self::USER_FAVORITES_TABLE,
            Self::REVIEWS_TABLE,
            Self::NOTIFICATION_SETTINGS_TABLE,
            Self::NOTIFICATION_LOGS_TABLE,
        ]
    }
}

/// Status of the database schema
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SchemaStatus {
    /// Database has no staydb tables yet (fresh database)
    NotInitialized,

    /// Schema is current and all tables are present
    Current,

    /// Schema was provisioned by an older staydb version
    NeedsMigration { from: u32, to: u32 },

    /// Database was provisioned by a newer staydb version
    Incompatible {
        database_version: u32,
        required_version: u32,
    },

    /// Version matches but one or more tables are missing
    Corrupted,
}

impl std::fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaStatus::NotInitialized => write!(f, "not initialized"),
            SchemaStatus::Current => write!(f, "current (v{SCHEMA_VERSION})"),
            SchemaStatus::NeedsMigration { from, to } => {
                write!(f, "needs migration (v{from} -> v{to})")
            }
            SchemaStatus::Incompatible {
                database_version,
                required_version,
            } => write!(
                f,
                "incompatible (database v{database_version}, tool requires v{required_version})"
            ),
            SchemaStatus::Corrupted => write!(f, "corrupted (missing tables)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Extract the table name from a `CREATE TABLE IF NOT EXISTS` statement.
    fn created_table(sql: &str) -> &str {
        let rest = sql
            .split("CREATE TABLE IF NOT EXISTS")
            .nth(1)
            .expect("not a create-if-not-exists statement");
        rest.split_whitespace().next().unwrap().trim_end_matches('(')
    }

    /// Extract every table name referenced by a FOREIGN KEY clause.
    fn referenced_tables(sql: &str) -> Vec<&str> {
        sql.match_indices("REFERENCES")
            .map(|(idx, _)| {
                let rest = &sql[idx + "REFERENCES".len()..];
                let target = rest.split_whitespace().next().unwrap();
                &target[..target.find('(').unwrap_or(target.len())]
            })
            .collect()
    }

    #[test]
    fn test_twelve_tables() {
        assert_eq!(SchemaDefinitions::ordered_statements().len(), 12);
        assert_eq!(TABLE_NAMES.len(), 12);
    }

    #[test]
    fn test_statement_order_matches_table_names() {
        let names: Vec<&str> = SchemaDefinitions::ordered_statements()
            .iter()
            .map(|sql| created_table(sql))
            .collect();
        assert_eq!(names, TABLE_NAMES);
    }

    #[test]
    fn test_all_statements_are_idempotent() {
        for sql in SchemaDefinitions::ordered_statements() {
            assert!(
                sql.contains("CREATE TABLE IF NOT EXISTS"),
                "statement is not re-applicable: {}",
                sql
            );
        }
    }

    #[test]
    fn test_foreign_key_targets_precede_their_tables() {
        let mut created: Vec<&str> = Vec::new();
        for sql in SchemaDefinitions::ordered_statements() {
            for target in referenced_tables(sql) {
                assert!(
                    created.contains(&target),
                    "table `{}` references `{}` before it is created",
                    created_table(sql),
                    target
                );
            }
            created.push(created_table(sql));
        }
    }

    #[test]
    fn test_reservations_follow_rooms_and_users() {
        let pos = |name: &str| TABLE_NAMES.iter().position(|t| *t == name).unwrap();
        assert!(pos("reservations") > pos("rooms"));
        assert!(pos("reservations") > pos("users"));
        assert!(pos("reviews") > pos("reservations"));
    }

    #[test]
    fn test_review_constraints() {
        assert!(SchemaDefinitions::REVIEWS_TABLE.contains("CHECK (rating BETWEEN 1 AND 5)"));
        assert!(SchemaDefinitions::REVIEWS_TABLE
            .contains("UNIQUE KEY uniq_reservation_review (reservation_id)"));
    }

    #[test]
    fn test_schema_status_display() {
        assert_eq!(
            format!("{}", SchemaStatus::NotInitialized),
            "not initialized"
        );
        assert_eq!(
            format!("{}", SchemaStatus::NeedsMigration { from: 0, to: 1 }),
            "needs migration (v0 -> v1)"
        );
    }
}
