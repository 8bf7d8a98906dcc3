use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for administrative region codes (kode wilayah)
    /// One to four dot-delimited numeric segments
    /// - Valid: "33", "33.74", "33.74.10", "33.74.10.1002"
    /// - Invalid: "", "33.", ".74", "33..74", "33.74.10.1002.1", "3a"
    pub static ref REGION_CODE_REGEX: Regex = Regex::new(r"^\d+(?:\.\d+){0,3}$").unwrap();
}
