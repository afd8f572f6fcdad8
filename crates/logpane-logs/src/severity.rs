use logpane_types::LogLevel;

/// Data sources that report severities on the ROS 2 scale
pub const ROS2_DATA_SOURCE_IDS: [&str; 2] = ["ros2-local-bagfile", "ros2-socket"];

/// ROS 2 native severity for each primary level
static ROS2_SCALE: [(LogLevel, i32); 6] = [
    (LogLevel::Unknown, 0),
    (LogLevel::Debug, 10),
    (LogLevel::Info, 20),
    (LogLevel::Warn, 30),
    (LogLevel::Error, 40),
    (LogLevel::Fatal, 50),
];

/// Numeric scale a data source uses for raw message severities
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SeverityConvention {
    /// Consecutive integers, identical to [`LogLevel`] values
    #[default]
    Primary,
    /// Multiples of ten, 0 (unknown) through 50 (fatal)
    Ros2,
}

impl SeverityConvention {
    /// Resolve the convention used by a data source
    pub fn for_data_source(data_source_id: Option<&str>) -> Self {
        match data_source_id {
            Some(id) if ROS2_DATA_SOURCE_IDS.contains(&id) => Self::Ros2,
            _ => Self::Primary,
        }
    }

    fn table(&self) -> Option<&'static [(LogLevel, i32)]> {
        match self {
            Self::Primary => None,
            Self::Ros2 => Some(&ROS2_SCALE[..]),
        }
    }

    /// Native value of a primary level in this convention
    pub fn native_value(&self, level: LogLevel) -> i32 {
        self.table()
            .and_then(|table| table.iter().find(|(l, _)| *l == level))
            .map_or(level.value(), |(_, native)| *native)
    }

    /// Translate a threshold given in primary values into this convention.
    ///
    /// Values that are not a primary level are returned unchanged.
    pub fn translate_threshold(&self, min_log_level: i32) -> i32 {
        LogLevel::from_value(min_log_level)
            .map_or(min_log_level, |level| self.native_value(level))
    }

    /// Map a raw severity in this convention back to a primary level
    pub fn normalize(&self, raw: i32) -> LogLevel {
        match self.table() {
            None => LogLevel::from_value(raw).unwrap_or_default(),
            Some(table) => table
                .iter()
                .find(|(_, native)| *native == raw)
                .map_or(LogLevel::Unknown, |(level, _)| *level),
        }
    }
}

/// Threshold to compare raw severities from `data_source_id` against
pub fn effective_threshold(min_log_level: i32, data_source_id: Option<&str>) -> i32 {
    SeverityConvention::for_data_source(data_source_id).translate_threshold(min_log_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convention_lookup() {
        assert_eq!(
            SeverityConvention::for_data_source(Some("ros2-local-bagfile")),
            SeverityConvention::Ros2
        );
        assert_eq!(
            SeverityConvention::for_data_source(Some("ros2-socket")),
            SeverityConvention::Ros2
        );
        assert_eq!(
            SeverityConvention::for_data_source(Some("ros1-socket")),
            SeverityConvention::Primary
        );
        assert_eq!(
            SeverityConvention::for_data_source(None),
            SeverityConvention::Primary
        );
    }

    #[test]
    fn test_ros2_threshold() {
        assert_eq!(effective_threshold(LogLevel::Warn.value(), Some("ros2-local-bagfile")), 30);
        for level in LogLevel::ALL {
            assert_eq!(
                effective_threshold(level.value(), Some("ros2-socket")),
                level.value() * 10
            );
        }
    }

    #[test]
    fn test_primary_threshold_passes_through() {
        assert_eq!(effective_threshold(LogLevel::Warn.value(), None), 3);
        assert_eq!(effective_threshold(LogLevel::Warn.value(), Some("mcap-file")), 3);
    }

    #[test]
    fn test_unknown_level_passes_through() {
        assert_eq!(effective_threshold(999, Some("ros2-socket")), 999);
        assert_eq!(effective_threshold(-4, Some("ros2-socket")), -4);
        assert_eq!(effective_threshold(30, Some("ros2-socket")), 30);
    }

    #[test]
    fn test_normalize() {
        let ros2 = SeverityConvention::Ros2;
        assert_eq!(ros2.normalize(40), LogLevel::Error);
        assert_eq!(ros2.normalize(4), LogLevel::Unknown);
        assert_eq!(ros2.normalize(35), LogLevel::Unknown);

        let primary = SeverityConvention::Primary;
        assert_eq!(primary.normalize(4), LogLevel::Error);
        assert_eq!(primary.normalize(40), LogLevel::Unknown);
    }
}
