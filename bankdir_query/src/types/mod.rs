mod publication;
pub use self::publication::{newest_first, sort_newest_first, Publication, Season, MAX_YEAR, MIN_YEAR};

mod institution;
pub use self::institution::{AssetRange, InstitutionType};

mod figures;
pub use self::figures::{Financials, FINANCIAL_FIELDS};
