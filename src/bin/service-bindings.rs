fn main() -> color_eyre::eyre::Result<()> {
    service_bindings::cli::main()
}
