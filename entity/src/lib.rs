pub mod email_otp;
pub mod password_reset;
pub mod reminder;
pub mod session;
pub mod user;

/*
 A user registers unverified and gets a verify OTP by mail. Verifying (or logging in
 once verified) opens a session. Sessions, reset grants and reminders hang off the
 user row and cascade with it. OTPs are keyed by email since they can exist before
 anyone has proven they own the address.
 */
