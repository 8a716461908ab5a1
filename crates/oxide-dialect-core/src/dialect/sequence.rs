//! Sequence and identity column templates.

/// Sequence DDL and next-value templates. `{name}` is replaced by the
/// sequence name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSupport {
    /// `CREATE SEQUENCE {name}`
    pub create: &'static str,
    /// Appended when start/increment are given; `{start}` and
    /// `{increment}` are replaced.
    pub start_increment: &'static str,
    /// `DROP SEQUENCE {name}`
    pub drop: &'static str,
    /// Next-value expression usable inside a statement.
    pub next_value: &'static str,
    /// Standalone query returning the next value.
    pub select_next_value: &'static str,
}

impl SequenceSupport {
    /// Standard `NEXT VALUE FOR` sequences.
    pub const STANDARD: Self = Self {
        create: "CREATE SEQUENCE {name}",
        start_increment: " START WITH {start} INCREMENT BY {increment}",
        drop: "DROP SEQUENCE {name}",
        next_value: "NEXT VALUE FOR {name}",
        select_next_value: "VALUES NEXT VALUE FOR {name}",
    };

    /// Renders the create statement.
    #[must_use]
    pub fn create_sql(&self, name: &str, start: i64, increment: i64) -> String {
        let mut sql = self.create.replace("{name}", name);
        sql.push_str(
            &self
                .start_increment
                .replace("{start}", &start.to_string())
                .replace("{increment}", &increment.to_string()),
        );
        sql
    }

    /// Renders the drop statement.
    #[must_use]
    pub fn drop_sql(&self, name: &str) -> String {
        self.drop.replace("{name}", name)
    }

    /// Renders the next-value expression.
    #[must_use]
    pub fn next_value_sql(&self, name: &str) -> String {
        self.next_value.replace("{name}", name)
    }

    /// Renders the next-value query.
    #[must_use]
    pub fn select_next_value_sql(&self, name: &str) -> String {
        self.select_next_value.replace("{name}", name)
    }
}

/// Identity column templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySupport {
    /// Fragment appended to the column type.
    pub column: &'static str,
    /// Value to insert into the identity column, when one must be named.
    pub insert_value: Option<&'static str>,
}

impl IdentitySupport {
    /// SQL:2003 identity columns.
    pub const STANDARD: Self = Self {
        column: " GENERATED BY DEFAULT AS IDENTITY",
        insert_value: Some("DEFAULT"),
    };
}
