//! Account CLI commands
//!
//! Sign in and out, register, and manage the signed-in profile.

use anyhow::Result;
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;

use super::output::{self, OutputFormat};
use super::{flag_or_prompt, report, signed_in};
use crate::domain::{Address, User};
use crate::forms::{PasswordForm, ProfileForm, RegisterForm};
use crate::session::Session;
use crate::utils::format_date;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in and store the token in the config file
    #[command(
        after_help = "EXAMPLES:\n    # Sign in, prompting for the password\n    travelbook auth login --email ada@example.com"
    )]
    Login {
        #[arg(long)]
        email: Option<String>,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,

        /// Prompted for when omitted
        #[arg(long)]
        confirm_password: Option<String>,

        #[command(flatten)]
        address: AddressArgs,
    },

    /// Forget the stored token
    Logout,

    /// Show the signed-in account
    Whoami {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Update name, phone or address of the signed-in account
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[command(flatten)]
        address: AddressArgs,
    },

    /// Change the password of the signed-in account
    Password {
        #[arg(long)]
        current: Option<String>,

        #[arg(long)]
        new: Option<String>,

        #[arg(long)]
        confirm: Option<String>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct AddressArgs {
    #[arg(long)]
    pub street: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub zip_code: Option<String>,

    #[arg(long)]
    pub country: Option<String>,
}

impl AddressArgs {
    /// Overwrite the given fields of `address`
    pub fn apply(self, address: &mut Address) {
        let fields = [
            (self.street, &mut address.street),
            (self.city, &mut address.city),
            (self.state, &mut address.state),
            (self.zip_code, &mut address.zip_code),
            (self.country, &mut address.country),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Handle auth commands
pub async fn handle_auth_command(command: AuthCommands, session: &mut Session) -> Result<()> {
    match command {
        AuthCommands::Login { email, password } => login(session, email, password).await?,
        AuthCommands::Register { name, email, phone, password, confirm_password, address } => {
            let mut form = RegisterForm {
                name,
                email,
                phone,
                password: flag_or_prompt(password, "Password")?,
                confirm_password: flag_or_prompt(confirm_password, "Confirm password")?,
                ..RegisterForm::default()
            };
            address.apply(&mut form.address);
            register(session, &form).await?
        }
        AuthCommands::Logout => {
            session.logout().map_err(report)?;
            println!("{}", "Logged out".green());
        }
        AuthCommands::Whoami { output } => {
            signed_in(session).await?;
            let user = session.require_user().map_err(report)?;
            match output {
                OutputFormat::Table => print_user(user),
                format => output::print_output(user, format)?,
            }
        }
        AuthCommands::Profile { name, phone, address } => {
            signed_in(session).await?;
            let mut form = ProfileForm::from_user(session.require_user().map_err(report)?);
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(phone) = phone {
                form.phone = phone;
            }
            address.apply(&mut form.address);

            let user = session.update_profile(&form).await.map_err(report)?;
            println!("{}", "Profile updated successfully".green());
            print_user(user);
        }
        AuthCommands::Password { current, new, confirm } => {
            signed_in(session).await?;
            let form = PasswordForm {
                current_password: flag_or_prompt(current, "Current password")?,
                new_password: flag_or_prompt(new, "New password")?,
                confirm_password: flag_or_prompt(confirm, "Confirm new password")?,
            };
            session.change_password(&form).await.map_err(report)?;
            println!("{}", "Password changed successfully".green());
        }
    }

    Ok(())
}

async fn login(session: &mut Session, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = flag_or_prompt(email, "Email")?;
    let password = flag_or_prompt(password, "Password")?;

    let user = session.login(&email, &password).await.map_err(report)?;
    println!("{} {}", "Welcome back,".green(), user.name.bold());
    Ok(())
}

async fn register(session: &mut Session, form: &RegisterForm) -> Result<()> {
    let user = session.register(form).await.map_err(report)?;
    println!("{} {}", "Account created. Welcome,".green(), user.name.bold());
    Ok(())
}

fn print_user(user: &User) {
    println!();
    println!("{:<12} {}", "Name", user.name);
    println!("{:<12} {}", "Email", user.email);
    println!("{:<12} {}", "Phone", user.phone.as_deref().unwrap_or("-"));
    println!("{:<12} {}", "Role", user.role);
    if let Some(address) = user.address.as_ref().filter(|a| !a.is_empty()) {
        let parts: Vec<&str> = [
            address.street.as_str(),
            address.city.as_str(),
            address.state.as_str(),
            address.zip_code.as_str(),
            address.country.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
        println!("{:<12} {}", "Address", parts.join(", "));
    }
    if let Some(created) = user.created_at {
        println!("{:<12} {}", "Member since", format_date(created.date_naive()));
    }
    println!();
}
