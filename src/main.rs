fn main() {
    if let Err(e) = pianoscore_lib::run() {
        eprintln!("pianoscore: {:#}", e);
        std::process::exit(1);
    }
}
