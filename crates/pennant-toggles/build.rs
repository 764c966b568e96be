use pennant_spec::compile::BuildCtx;

fn main() {
	let ctx = BuildCtx::new();
	pennant_spec::compile::build(&ctx);
}
