use crate::utils::webutils::validate_session;
use actix_web::web;

pub mod health;
pub mod reminder;
pub mod user;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let session_auth = actix_web_httpauth::middleware::HttpAuthentication::bearer(validate_session);

    cfg.service(web::scope("/health").service(health::health));
    cfg.service(
        web::scope("/api/user")
            .service(user::register::register)
            .service(user::login::login)
            .service(user::verify_email::verify_email)
            .service(user::resend_otp::resend_otp)
            .service(user::forgot_password::forgot_password)
            .service(user::verify_email_reset::verify_email_reset)
            .service(user::reset_password::reset_password)
            .service(
                web::scope("/get-data")
                    .service(user::get_data::get_data)
                    .wrap(session_auth.clone())
            )
            .service(
                web::scope("/logout")
                    .service(user::logout::logout)
                    .wrap(session_auth.clone())
            )
            .service(
                web::scope("/delete")
                    .service(user::delete::delete)
                    .wrap(session_auth.clone())
            )
    );
    cfg.service(
        web::scope("/api/reminder")
            .service(reminder::list::list)
            .service(reminder::add::add)
            .service(reminder::delete::remove)
            .wrap(session_auth)
    );
}
