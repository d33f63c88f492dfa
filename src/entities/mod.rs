//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod contribution;
pub mod credit_group;
pub mod current_account;
pub mod installment;
pub mod loan;
pub mod member_share;
pub mod person;
pub mod shareholder;
pub mod system_state;

// Re-export specific types to avoid conflicts
pub use contribution::{Column as ContributionColumn, Entity as Contribution, Model as ContributionModel};
pub use credit_group::{Column as CreditGroupColumn, Entity as CreditGroup, Model as CreditGroupModel};
pub use current_account::{
    Column as CurrentAccountColumn, Entity as CurrentAccount, Model as CurrentAccountModel,
};
pub use installment::{Column as InstallmentColumn, Entity as Installment, Model as InstallmentModel};
pub use loan::{Column as LoanColumn, Entity as Loan, Model as LoanModel};
pub use member_share::{Column as MemberShareColumn, Entity as MemberShare, Model as MemberShareModel};
pub use person::{Column as PersonColumn, Entity as Person, Model as PersonModel};
pub use shareholder::{Column as ShareholderColumn, Entity as Shareholder, Model as ShareholderModel};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
