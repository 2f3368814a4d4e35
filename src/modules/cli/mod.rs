use std::io;
use std::thread;
use std::time::Duration;

use log::debug;

use crate::modules::auth::flow::AuthFlow;
use crate::modules::auth::screens::Screen;
use crate::modules::auth::validation::Field;
use crate::modules::utils::io::{prompt, prompt_secret, read_line};
use crate::modules::utils::time::format_millis;

/// What a screen handler wants the main loop to do next
enum CliAction {
    Continue, // Re-render and keep going
    Exit,     // Leave the program
}

/// Run the interactive front end until the user exits.
///
/// Every decision in here is a call into [`AuthFlow`]; this module only
/// renders state and forwards input events.
pub fn run(flow: &mut AuthFlow) -> io::Result<()> {
    loop {
        // Let the component fire any elapsed deadline before rendering
        flow.tick();

        let action = if flow.is_authenticated() {
            authenticated_screen(flow)?
        } else {
            match flow.screen() {
                Screen::Login => login_screen(flow)?,
                Screen::Register => register_screen(flow)?,
                Screen::ForgotPassword => forgot_password_screen(flow)?,
            }
        };

        match action {
            CliAction::Continue => {}
            CliAction::Exit => {
                println!("Goodbye!");
                return Ok(());
            }
        }
    }
}

fn login_screen(flow: &mut AuthFlow) -> io::Result<CliAction> {
    println!("\n=== Log in ===");
    println!("(type 'register' to create an account, 'forgot' for password reset, 'exit' to quit)");

    let email = prompt("Email")?;
    match email.to_lowercase().as_str() {
        "exit" | "quit" => return Ok(CliAction::Exit),
        "register" => {
            flow.show_register();
            return Ok(CliAction::Continue);
        }
        "forgot" => {
            flow.show_forgot_password();
            return Ok(CliAction::Continue);
        }
        _ => {}
    }

    let password = prompt_secret("Password")?;

    flow.set_field(Field::Email, &email);
    flow.set_field(Field::Password, &password);
    flow.submit();

    report_errors(flow);
    Ok(CliAction::Continue)
}

fn register_screen(flow: &mut AuthFlow) -> io::Result<CliAction> {
    println!("\n=== Sign up ===");
    println!("(type 'back' as the name to return to login, 'exit' to quit)");

    let username = prompt("Full name")?;
    match username.to_lowercase().as_str() {
        "exit" | "quit" => return Ok(CliAction::Exit),
        "back" => {
            flow.show_login();
            return Ok(CliAction::Continue);
        }
        _ => {}
    }

    let email = prompt("Email")?;
    let password = prompt_secret("Create password")?;
    let confirm = prompt_secret("Confirm password")?;

    flow.set_field(Field::Username, &username);
    flow.set_field(Field::Email, &email);
    flow.set_field(Field::Password, &password);
    flow.set_field(Field::ConfirmPassword, &confirm);
    flow.submit();

    report_errors(flow);
    Ok(CliAction::Continue)
}

fn forgot_password_screen(flow: &mut AuthFlow) -> io::Result<CliAction> {
    if flow.reset_sent() {
        println!("\nPassword reset link sent to your email");
        // Hold the notice until the component flips back to login
        while flow.reset_sent() {
            thread::sleep(Duration::from_millis(250));
            flow.tick();
        }
        println!("Returning to login...");
        return Ok(CliAction::Continue);
    }

    println!("\n=== Reset Password ===");
    println!("Enter your email and we'll send you a reset link");
    println!("(type 'back' to return to login, 'exit' to quit)");

    if flow.take_focus_request().is_some() {
        // The terminal has a single cursor, so acknowledging the request
        // is all the focus there is to move
        debug!("Focus moved to the reset email field");
    }

    let email = prompt("Email")?;
    match email.to_lowercase().as_str() {
        "exit" | "quit" => return Ok(CliAction::Exit),
        "back" => {
            flow.show_login();
            return Ok(CliAction::Continue);
        }
        _ => {}
    }

    flow.set_field(Field::ResetEmail, &email);
    flow.submit();

    report_errors(flow);
    Ok(CliAction::Continue)
}

fn authenticated_screen(flow: &mut AuthFlow) -> io::Result<CliAction> {
    if let Some(user) = flow.current_user() {
        println!("\nSigned in as {} <{}>", user.username, user.email);
        println!("Member since {}", format_millis(user.id));
        match &user.profile_image {
            Some(image) => println!("Profile image: {}", image),
            None => println!("Profile image: none"),
        }
    }
    println!("(type 'logout' to sign out, 'exit' to quit)");

    let command = read_line()?;
    match command.to_lowercase().as_str() {
        "logout" => {
            flow.logout();
            println!("Logged out.");
        }
        "exit" | "quit" => return Ok(CliAction::Exit),
        "" => {}
        other => println!("Unknown command: {}", other),
    }

    Ok(CliAction::Continue)
}

fn report_errors(flow: &AuthFlow) {
    if flow.errors().is_empty() {
        return;
    }
    println!("\nPlease fix the following and try again:");
    for (field, message) in flow.errors() {
        println!("  {}: {}", field, message);
    }
}
