//! Year-range expansion.

use std::collections::BTreeSet;

use super::vehicle::YearRange;

/// Expand year ranges into the sorted, deduplicated list of years they cover.
///
/// An inverted range (`from > to`) contributes no years.
pub fn expand_years<'a, I>(ranges: I) -> Vec<i32>
where
    I: IntoIterator<Item = &'a YearRange>,
{
    ranges
        .into_iter()
        .flat_map(YearRange::years)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_ranges_are_merged() {
        let ranges = [YearRange::new(2010, 2012), YearRange::new(2011, 2013)];
        assert_eq!(expand_years(&ranges), vec![2010, 2011, 2012, 2013]);
    }

    #[test]
    fn inverted_range_yields_nothing() {
        assert!(expand_years(&[YearRange::new(2015, 2012)]).is_empty());
    }

    #[test]
    fn disjoint_ranges_stay_sorted() {
        let ranges = [YearRange::new(2020, 2021), YearRange::new(1999, 2000)];
        assert_eq!(expand_years(&ranges), vec![1999, 2000, 2020, 2021]);
    }

    #[test]
    fn single_year_range() {
        assert_eq!(expand_years(&[YearRange::new(2004, 2004)]), vec![2004]);
    }

    #[test]
    fn no_ranges_no_years() {
        let none: [YearRange; 0] = [];
        assert!(expand_years(&none).is_empty());
    }
}
