fn main() {
    std::process::exit(quickmd::app::startup::startup());
}
