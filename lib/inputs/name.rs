use chrono::NaiveDate;

/**
    Substitutes the `$$` placeholder in a release name with the given
    date, formatted as compact digits (`YYYYMMDD`).

    Only the first occurrence is substituted.
*/
pub(super) fn substitute_build_date(name: &str, date: NaiveDate) -> String {
    if !name.contains("$$") {
        return name.to_string();
    }
    name.replacen("$$", &date.format("%Y%m%d").to_string(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn substitutes_placeholder() {
        assert_eq!(
            substitute_build_date("Build $$", date(2024, 3, 7)),
            "Build 20240307"
        );
    }

    #[test]
    fn substitutes_first_occurrence_only() {
        // A second placeholder stays literal
        assert_eq!(
            substitute_build_date("$$ and $$", date(2024, 3, 7)),
            "20240307 and $$"
        );
    }

    #[test]
    fn leaves_plain_names_untouched() {
        assert_eq!(
            substitute_build_date("Nightly Release", date(2024, 3, 7)),
            "Nightly Release"
        );
        assert_eq!(substitute_build_date("", date(2024, 3, 7)), "");
    }

    #[test]
    fn pads_single_digit_months_and_days() {
        assert_eq!(substitute_build_date("$$", date(2025, 1, 2)), "20250102");
    }
}
