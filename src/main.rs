fn main() -> anyhow::Result<()> {
    yhee_lib::run()
}
