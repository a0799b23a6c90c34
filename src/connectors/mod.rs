//! Per-connector configuration key lists.
//!
//! Every connector module contributes the keys it reads and writes through
//! the routing facade, split by sensitivity. The classification registry
//! unions these lists at startup; nothing else in the crate should reference
//! the constants directly.
//!
//! When adding a connector, add its module here and register its `KEYS`
//! entry in [`KEY_LISTS`] — a key left off both lists routes to the
//! database and is logged as unclassified.

/// A connector's contribution to the classification registry.
#[derive(Debug, Clone, Copy)]
pub struct ConnectorKeys {
    /// Connector slug, as used in signing-secret parameter paths.
    pub connector: &'static str,
    /// Keys whose values must live in the encrypted parameter store.
    pub sensitive: &'static [&'static str],
    /// Keys whose values live in the tenant database.
    pub non_sensitive: &'static [&'static str],
}

/// Platform-level keys not owned by any one connector.
pub mod platform {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "platform",
        sensitive: &[],
        non_sensitive: &[
            "COMPANY_NAME",
            "DEFAULT_TIMEZONE",
            "ONBOARDING_COMPLETE",
            "BILLING_PLAN",
        ],
    };
}

pub mod github {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "github",
        sensitive: &["GITHUB_TOKEN", "GITHUB_WEBHOOK_SECRET", "GITHUB_APP_PRIVATE_KEY"],
        non_sensitive: &["GITHUB_ORG", "GITHUB_SYNC_ENABLED", "GITHUB_REPO_FILTERS"],
    };
}

pub mod slack {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "slack",
        sensitive: &["SLACK_BOT_TOKEN", "SLACK_SIGNING_SECRET"],
        non_sensitive: &["SLACK_WORKSPACE_ID", "SLACK_DEFAULT_CHANNEL"],
    };
}

pub mod hubspot {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "hubspot",
        sensitive: &["HUBSPOT_ACCESS_TOKEN", "HUBSPOT_REFRESH_TOKEN"],
        non_sensitive: &["HUBSPOT_PORTAL_ID", "HUBSPOT_SYNC_CONTACTS"],
    };
}

pub mod salesforce {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "salesforce",
        sensitive: &[
            "SALESFORCE_ACCESS_TOKEN",
            "SALESFORCE_REFRESH_TOKEN",
            "SALESFORCE_CLIENT_SECRET",
        ],
        non_sensitive: &["SALESFORCE_INSTANCE_URL", "SALESFORCE_API_VERSION"],
    };
}

pub mod monday {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "monday",
        sensitive: &["MONDAY_API_TOKEN", "MONDAY_SIGNING_SECRET"],
        non_sensitive: &["MONDAY_WORKSPACE_ID", "MONDAY_BOARD_IDS"],
    };
}

pub mod pipedrive {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "pipedrive",
        sensitive: &["PIPEDRIVE_API_TOKEN"],
        non_sensitive: &["PIPEDRIVE_COMPANY_DOMAIN"],
    };
}

pub mod teamwork {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "teamwork",
        sensitive: &["TEAMWORK_API_KEY"],
        non_sensitive: &["TEAMWORK_SITE_URL"],
    };
}

pub mod jira {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "jira",
        sensitive: &["JIRA_API_TOKEN", "JIRA_WEBHOOK_SECRET"],
        non_sensitive: &["JIRA_SITE_URL", "JIRA_USER_EMAIL", "JIRA_PROJECT_KEYS"],
    };
}

pub mod confluence {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "confluence",
        sensitive: &["CONFLUENCE_API_TOKEN"],
        non_sensitive: &["CONFLUENCE_SITE_URL", "CONFLUENCE_SPACE_KEYS"],
    };
}

pub mod snowflake {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "snowflake",
        sensitive: &["SNOWFLAKE_PASSWORD", "SNOWFLAKE_PRIVATE_KEY"],
        non_sensitive: &[
            "SNOWFLAKE_ACCOUNT",
            "SNOWFLAKE_USER",
            "SNOWFLAKE_WAREHOUSE",
            "SNOWFLAKE_DATABASE",
        ],
    };
}

pub mod linear {
    use super::ConnectorKeys;

    pub const KEYS: ConnectorKeys = ConnectorKeys {
        connector: "linear",
        sensitive: &["LINEAR_API_KEY", "LINEAR_WEBHOOK_SECRET"],
        non_sensitive: &["LINEAR_TEAM_IDS", "LINEAR_TRIAGE_ENABLED"],
    };
}

/// All connector key lists, in registration order.
pub const KEY_LISTS: &[ConnectorKeys] = &[
    platform::KEYS,
    github::KEYS,
    slack::KEYS,
    hubspot::KEYS,
    salesforce::KEYS,
    monday::KEYS,
    pipedrive::KEYS,
    teamwork::KEYS,
    jira::KEYS,
    confluence::KEYS,
    snowflake::KEYS,
    linear::KEYS,
];
