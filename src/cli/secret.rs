use crate::utils;

pub fn secret() {
    println!("SESSION_SECRET={}", utils::generate_session_secret());
}
