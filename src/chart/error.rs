use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Dataset has no monthly entries to chart")]
    EmptyDataset,

    #[error("Entry for year {year} has month {month}, expected 1 through 12")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Year {year} is outside the supported calendar range")]
    InvalidYear { year: i32 },

    #[error("Failed to format chart markup")]
    Format(#[from] std::fmt::Error),
}
