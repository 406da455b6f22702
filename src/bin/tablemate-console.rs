//! Menu-driven console client for the TableMate API.
//!
//! This binary exercises the account surface of the API: signup,
//! login, profile management, and session teardown, with the token
//! pair persisted to a local file between runs.
//!
//! # Usage
//!
//! ```bash
//! # Against the default localhost server
//! tablemate-console
//!
//! # Against a specific server, without colors
//! tablemate-console --api-url http://api.example.com --no-color
//! ```

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use tablemate::console::{
    ConsoleArgs, ConsoleConfig, MenuAction, SessionState, menu, parse_choice, transition,
};
use tablemate::types::{
    ChangePasswordRequest, EmailUpdateRequest, Gender, PhoneNumberUpdateRequest,
    ProfileUpdateRequest, SignupRequest,
};
use tablemate::{ApiClient, CredentialStore, FileStore, PlainTextRenderer, Renderer};

/// Main entry point for the tablemate-console application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ConsoleArgs::from_command_line_relaxed("tablemate-console [OPTIONS]");
    let config = ConsoleConfig::from(args);

    let store = Arc::new(FileStore::open(&config.token_file));
    let client = ApiClient::with_options(store, Some(config.api_url.clone()), None)?;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    println!("TableMate console ({})", config.api_url);
    if !client.health().await.unwrap_or(false) {
        renderer.print_info("warning: server not reachable, requests will fail");
    }

    // Restore a previous session if the stored tokens still work.
    let mut state = if client.is_authenticated() {
        match client.profile().await {
            Ok(profile) => {
                renderer.print_success(&format!("Welcome back, {}", profile.nickname));
                SessionState::Authenticated
            }
            Err(err) => {
                renderer.print_info(&format!("Stored session no longer valid ({err})"));
                client.store().clear();
                SessionState::Unauthenticated
            }
        }
    } else {
        SessionState::Unauthenticated
    };

    loop {
        println!();
        for item in menu(state) {
            println!("  {}) {}", item.key, item.label);
        }

        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        };

        let Some(action) = parse_choice(state, &line) else {
            renderer.print_error("unknown choice, pick a key from the menu");
            continue;
        };
        if action == MenuAction::Quit {
            break;
        }

        match run_action(&client, action, &mut rl, &mut renderer).await {
            Ok(()) => {
                state = transition(state, action);
            }
            Err(err) => {
                renderer.print_error(&err.to_string());
                // A 401 that survived refresh means the session is
                // gone; drop to the login menu.
                if err.is_auth_expired() || err.status() == Some(401) {
                    client.store().clear();
                    state = SessionState::Unauthenticated;
                }
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Prompt for one line; None if the user interrupted.
fn prompt(rl: &mut DefaultEditor, label: &str) -> Option<String> {
    match rl.readline(label) {
        Ok(line) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Prompt for one line, mapping an empty answer to None.
fn prompt_optional(rl: &mut DefaultEditor, label: &str) -> Option<Option<String>> {
    let line = prompt(rl, label)?;
    Some(if line.is_empty() { None } else { Some(line) })
}

/// Run one menu action, prompting for its inputs.
async fn run_action(
    client: &ApiClient,
    action: MenuAction,
    rl: &mut DefaultEditor,
    renderer: &mut PlainTextRenderer,
) -> tablemate::Result<()> {
    match action {
        MenuAction::Signup => {
            let Some(email) = prompt(rl, "Email: ") else {
                return Ok(());
            };
            let Some(password) = prompt(rl, "Password: ") else {
                return Ok(());
            };
            let Some(nickname) = prompt(rl, "Nickname: ") else {
                return Ok(());
            };
            let Some(gender) = prompt(rl, "Gender (MALE/FEMALE): ") else {
                return Ok(());
            };
            let gender = match gender.to_uppercase().as_str() {
                "MALE" | "M" => Gender::Male,
                "FEMALE" | "F" => Gender::Female,
                _ => Gender::Unknown,
            };
            let Some(age) = prompt(rl, "Age: ") else {
                return Ok(());
            };
            let age: u32 = match age.parse() {
                Ok(age) => age,
                Err(_) => {
                    renderer.print_error("age must be a number");
                    return Ok(());
                }
            };
            let Some(phone_number) = prompt(rl, "Phone number (010xxxxxxxx): ") else {
                return Ok(());
            };
            let Some(profile_image_url) =
                prompt_optional(rl, "Profile image URL (optional, enter to skip): ")
            else {
                return Ok(());
            };

            let request = SignupRequest {
                email,
                password,
                nickname,
                gender,
                age,
                phone_number,
                profile_image_url,
            };
            let message = client.signup(&request).await?;
            renderer.print_success(&message);
            renderer.print_info("Now log in with your new account.");
        }
        MenuAction::Login => {
            let Some(email) = prompt(rl, "Email: ") else {
                return Ok(());
            };
            let Some(password) = prompt(rl, "Password: ") else {
                return Ok(());
            };
            client.login(&email, &password).await?;
            renderer.print_success("Logged in.");
        }
        MenuAction::GetProfile => {
            let profile = client.profile().await?;
            println!("  nickname: {}", profile.nickname);
            println!(
                "  image:    {}",
                profile.profile_image_url.as_deref().unwrap_or("(none)")
            );
        }
        MenuAction::UpdateProfile => {
            let Some(nickname) = prompt(rl, "New nickname: ") else {
                return Ok(());
            };
            let Some(profile_image_url) =
                prompt_optional(rl, "New profile image URL (optional, enter to skip): ")
            else {
                return Ok(());
            };
            let profile = client
                .update_profile(&ProfileUpdateRequest::new(nickname, profile_image_url))
                .await?;
            renderer.print_success(&format!("Profile updated: {}", profile.nickname));
        }
        MenuAction::UpdateEmail => {
            let Some(new_email) = prompt(rl, "New email: ") else {
                return Ok(());
            };
            let Some(current_password) = prompt(rl, "Current password: ") else {
                return Ok(());
            };
            let response = client
                .update_email(&EmailUpdateRequest::new(new_email, current_password))
                .await?;
            renderer.print_success(&format!("Email changed to {}", response.email));
            renderer.print_info("The session was invalidated; log in again.");
            client.store().clear();
        }
        MenuAction::UpdatePhoneNumber => {
            let Some(new_phone_number) = prompt(rl, "New phone number (010xxxxxxxx): ") else {
                return Ok(());
            };
            let Some(current_password) = prompt(rl, "Current password: ") else {
                return Ok(());
            };
            let response = client
                .update_phone_number(&PhoneNumberUpdateRequest::new(
                    new_phone_number,
                    current_password,
                ))
                .await?;
            renderer.print_success(&format!("Phone number changed to {}", response.phone_number));
        }
        MenuAction::GetUserDetails => {
            let details = client.user_details().await?;
            println!("  email:    {}", details.email);
            println!("  nickname: {}", details.nickname);
            println!("  gender:   {:?}", details.gender);
            println!("  age:      {}", details.age);
            println!("  phone:    {}", details.phone_number);
            println!(
                "  image:    {}",
                details.profile_image_url.as_deref().unwrap_or("(none)")
            );
            println!("  role:     {:?}", details.role);
        }
        MenuAction::ChangePassword => {
            let Some(old_password) = prompt(rl, "Current password: ") else {
                return Ok(());
            };
            let Some(new_password) = prompt(rl, "New password: ") else {
                return Ok(());
            };
            let message = client
                .change_password(&ChangePasswordRequest::new(old_password, new_password))
                .await?;
            renderer.print_success(&message);
            renderer.print_info("The session was invalidated; log in again.");
            client.store().clear();
        }
        MenuAction::Logout => {
            client.logout().await?;
            renderer.print_success("Logged out.");
        }
        MenuAction::Withdraw => {
            let Some(confirm) = prompt(rl, "Type 'delete' to confirm account deletion: ") else {
                return Ok(());
            };
            if confirm != "delete" {
                renderer.print_info("Deletion cancelled.");
                return Ok(());
            }
            client.withdraw().await?;
            renderer.print_success("Account deleted.");
        }
        MenuAction::Quit => {}
    }
    Ok(())
}
