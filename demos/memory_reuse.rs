use carved::Arena;
use tracing_subscriber::EnvFilter;

fn main() -> carved::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let arena = Arena::new(256)?;
  println!("{arena}");

  let p1 = arena.allocate(32, 8)?;
  let p2 = arena.allocate(64, 8)?;
  let p3 = arena.allocate(16, 8)?;
  println!("{arena}");

  arena.deallocate(p2, 64, 8)?;
  println!("{arena}");

  arena.deallocate(p1, 32, 8)?;
  println!("{arena}");

  arena.deallocate(p3, 16, 8)?;
  println!("{arena}");

  println!("Allocating again to show reuse:");
  let p4 = arena.allocate(100, 8)?;
  assert_eq!(p4, p1);
  println!("{arena}");
  arena.deallocate(p4, 100, 8)?;

  for info in arena.diagnostics() {
    println!("{info}");
  }
  Ok(())
}
