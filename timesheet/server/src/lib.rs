pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Employee every request books hours for, in place of a login.
        #[serde(default = "default_employee_id")]
        pub employee_id: i32,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_employee_id() -> i32 {
        2
    }
}
pub mod entities;
pub mod timesheet;
pub mod web;
