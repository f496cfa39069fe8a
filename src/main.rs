fn main() -> anyhow::Result<()> {
    daycare_gateway_lib::run()
}
