//! Per-parameter validation rules for telemetry values.
//!
//! Every validator is a total predicate: malformed input yields `false`,
//! never an error. Unknown parameters are treated as valid.

mod audit;
mod domain;
mod registry;
mod rules;
mod structured;
mod temporal;
mod validators;

pub use audit::{AuditReport, ParameterAudit};
pub use domain::{
    AndroidOsVersionValidator, CountryCodeValidator, CurrencyIdValidator, FractionValidator,
    GAME_CURRENCIES, HexadecimalValidator, NumericIdValidator, RealmPathValidator,
    StickersStateValidator, TransactionIdValidator, UuidValidator, VersionHashValidator,
};
pub use registry::{Rule, RuleSet, ValidatorRegistry, validate_parameter};
pub use rules::default_rules;
pub use structured::{
    ActiveSegmentsValidator, ClickOnScreenValidator, OFFER_CURRENCIES,
    PackRaritiesWeightsValidator, PresentedOffersStringValidator, ReceivedStickersListValidator,
    RewardCenterValidator,
};
pub use temporal::{
    ClientTimestampValidator, DecimalTimestampValidator, IsoTimestampValidator, TimeValidator,
    UnixMillisValidator, UnixSecondsValidator, from_unix, parse_iso, parse_timestamp,
};
pub use validators::{
    BooleanValidator, FixedSetValidator, FormatValidator, InterruptedValidator, ListRule,
    ListValidator, RangeValidator, Validator,
};
