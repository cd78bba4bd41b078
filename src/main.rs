fn main() -> Result<(), Box<dyn std::error::Error>> {
    jukebox::runtime::run()
}
