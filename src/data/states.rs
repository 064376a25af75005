/// A U.S. state (or D.C.) with its position on the tile-grid map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsState {
    pub name: &'static str,
    /// USPS two-letter code.
    pub code: &'static str,
    pub row: u8,
    pub col: u8,
}

const fn st(name: &'static str, code: &'static str, row: u8, col: u8) -> UsState {
    UsState {
        name,
        code,
        row,
        col,
    }
}

/// Tile grid is 8 rows by 11 columns, one tile per state.
pub const GRID_ROWS: u8 = 8;
pub const GRID_COLS: u8 = 11;

pub const US_STATES: [UsState; 51] = [
    st("Alaska", "AK", 0, 0),
    st("Maine", "ME", 0, 10),
    st("Vermont", "VT", 1, 9),
    st("New Hampshire", "NH", 1, 10),
    st("Washington", "WA", 2, 0),
    st("Idaho", "ID", 2, 1),
    st("Montana", "MT", 2, 2),
    st("North Dakota", "ND", 2, 3),
    st("Minnesota", "MN", 2, 4),
    st("Wisconsin", "WI", 2, 5),
    st("Michigan", "MI", 2, 7),
    st("New York", "NY", 2, 8),
    st("Massachusetts", "MA", 2, 9),
    st("Oregon", "OR", 3, 0),
    st("Nevada", "NV", 3, 1),
    st("Wyoming", "WY", 3, 2),
    st("South Dakota", "SD", 3, 3),
    st("Iowa", "IA", 3, 4),
    st("Illinois", "IL", 3, 5),
    st("Indiana", "IN", 3, 6),
    st("Ohio", "OH", 3, 7),
    st("Pennsylvania", "PA", 3, 8),
    st("New Jersey", "NJ", 3, 9),
    st("Connecticut", "CT", 3, 10),
    st("California", "CA", 4, 0),
    st("Utah", "UT", 4, 1),
    st("Colorado", "CO", 4, 2),
    st("Nebraska", "NE", 4, 3),
    st("Missouri", "MO", 4, 4),
    st("Kentucky", "KY", 4, 5),
    st("West Virginia", "WV", 4, 6),
    st("Virginia", "VA", 4, 7),
    st("Maryland", "MD", 4, 8),
    st("Delaware", "DE", 4, 9),
    st("Rhode Island", "RI", 4, 10),
    st("Arizona", "AZ", 5, 1),
    st("New Mexico", "NM", 5, 2),
    st("Kansas", "KS", 5, 3),
    st("Arkansas", "AR", 5, 4),
    st("Tennessee", "TN", 5, 5),
    st("North Carolina", "NC", 5, 6),
    st("South Carolina", "SC", 5, 7),
    st("District of Columbia", "DC", 5, 8),
    st("Oklahoma", "OK", 6, 3),
    st("Louisiana", "LA", 6, 4),
    st("Mississippi", "MS", 6, 5),
    st("Alabama", "AL", 6, 6),
    st("Georgia", "GA", 6, 7),
    st("Hawaii", "HI", 7, 0),
    st("Texas", "TX", 7, 3),
    st("Florida", "FL", 7, 8),
];

/// Resolve a spreadsheet `State` value by USPS code or full name, ignoring
/// case and surrounding whitespace.
pub fn lookup(value: &str) -> Option<&'static UsState> {
    let value = value.trim();
    US_STATES.iter().find(|s| {
        s.code.eq_ignore_ascii_case(value) || s.name.eq_ignore_ascii_case(value)
    })
}
