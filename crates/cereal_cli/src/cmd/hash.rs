use cereal::model::structural::hash_str;

#[derive(clap::Args)]
pub struct Args {
	pub text: String,
}

/// Print the signed 32-bit hash of the UTF-16 code units of `text`.
pub fn run(args: Args) -> cereal::model::Result<()> {
	println!("{}", hash_str(&args.text));
	Ok(())
}
