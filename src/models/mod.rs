//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod account;
pub mod course;
pub mod deposit;
pub mod document;
pub mod location;
pub mod quotation;
pub mod user;
pub mod withdrawal;

// Re-export commonly used models
pub use account::{IdentityAccount, StoredObject};
pub use course::{Course, CourseQuery, CourseSort, CourseType, Page};
pub use deposit::{Deposit, DepositFilter, DepositRequest, DepositSource, DepositStatus, UpdateDepositStatusRequest};
pub use document::{CollectionPath, Document, DocumentPath};
pub use location::{Location, LocationRequest};
pub use quotation::{
    AccommodationSchedule, FlightSchedule, GolfSchedule, PaymentInfo, Quotation, QuotationDraft,
    QuotationFilter, QuotationStatus, RentalCarSchedule, UpdateQuotationStatusRequest,
};
pub use user::{CreateUserRequest, Role, UpdateUserRequest, User, UserFilter};
pub use withdrawal::{UpdateWithdrawalStatusRequest, Withdrawal, WithdrawalFilter, WithdrawalRequest, WithdrawalStatus};
