use chrono::Datelike;

use super::DateLabel;

/// Year/month of a modification timestamp, in whatever zone it carries.
/// Last fallback tier, so it cannot fail.
pub fn resolve<D: Datelike>(modified: &D) -> DateLabel {
    DateLabel::new(
        format!("{:04}", modified.year()),
        format!("{:02}", modified.month()),
    )
}
