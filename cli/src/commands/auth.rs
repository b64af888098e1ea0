//! Account and session commands: register, login, logout, status.

use diasys_cli::{OutputFormatter, Result};
use diasys_link::{DiasysApi, RegisterRequest, SessionManager, TokenStore};

use super::prompt_password;
use crate::args::{LoginArgs, RegisterArgs};

pub async fn handle_register<A: DiasysApi, S: TokenStore>(
    session: &SessionManager<A, S>,
    args: RegisterArgs,
    formatter: &OutputFormatter,
) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };
    let confirm_password = match args.confirm_password {
        Some(confirm) => confirm,
        None => prompt_password("Confirm password: ")?,
    };

    let request = RegisterRequest {
        name: args.name,
        email: args.email,
        password,
        confirm_password,
    };

    // Password rules and duplicate emails are the server's call
    session.register(&request).await?;
    println!(
        "{}",
        formatter.format_message(&format!(
            "Registration successful. Log in with `diasys login --email {}`.",
            request.email
        ))?
    );
    Ok(())
}

pub async fn handle_login<A: DiasysApi, S: TokenStore>(
    session: &SessionManager<A, S>,
    args: LoginArgs,
    formatter: &OutputFormatter,
) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };

    let user = session.login(&args.email, &password).await?;
    println!(
        "{}",
        formatter.format_message(&format!("Logged in as {} <{}>", user.name, user.email))?
    );
    Ok(())
}

pub async fn handle_logout<A: DiasysApi, S: TokenStore>(
    session: &SessionManager<A, S>,
    formatter: &OutputFormatter,
) -> Result<()> {
    session.logout().await?;
    println!("{}", formatter.format_message("Logged out")?);
    Ok(())
}

pub async fn handle_status<A: DiasysApi, S: TokenStore>(
    session: &SessionManager<A, S>,
    server_url: &str,
    formatter: &OutputFormatter,
) -> Result<()> {
    let state = session.sync().await?;
    println!("{}", formatter.format_status(&state, server_url)?);
    Ok(())
}
