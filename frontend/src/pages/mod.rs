mod finances;
mod settings;
mod students;

pub use finances::FinancesPage;
pub use settings::SettingsPage;
pub use students::StudentsPage;
