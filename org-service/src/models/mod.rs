mod admin;
mod organization;

pub use admin::AdminAccount;
pub use organization::OrganizationRecord;
