/// Tuning knobs for query execution.
///
/// None of these change query results, except `max_result_rows` which
/// truncates the ordered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Minimum row count of the table being joined in before the join engine
    /// builds a hash index on the join key instead of scanning it per row.
    pub hash_join_min_rows: usize,
    /// Upper bound on the number of rows a query returns.
    pub max_result_rows: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_join_min_rows: 64,
            max_result_rows: None,
        }
    }
}

impl EngineConfig {
    /// Config that always takes the nested-loop path, which keeps join
    /// behaviour easy to reason about in tests.
    pub fn for_testing() -> Self {
        Self {
            hash_join_min_rows: usize::MAX,
            max_result_rows: None,
        }
    }

    pub fn with_hash_join_min_rows(mut self, rows: usize) -> Self {
        self.hash_join_min_rows = rows;
        self
    }

    pub fn with_max_result_rows(mut self, rows: usize) -> Self {
        self.max_result_rows = Some(rows);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = EngineConfig::default()
            .with_hash_join_min_rows(0)
            .with_max_result_rows(10);

        assert_eq!(config.hash_join_min_rows, 0);
        assert_eq!(config.max_result_rows, Some(10));
        assert_eq!(EngineConfig::for_testing().hash_join_min_rows, usize::MAX);
    }
}
