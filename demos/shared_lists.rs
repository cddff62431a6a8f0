use carved::{
  Arena,
  List,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Employee {
  id: u32,
  name: String,
  salary: f64,
}

fn main() -> carved::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let shared = Arena::new(2048)?;
  let mut numbers = List::new_in(&shared);
  let mut staff = List::new_in(&shared);

  numbers.extend((0..5).map(|i| i * 10));
  numbers.push_front(-10);
  println!("numbers: {numbers:?}");

  staff.push_back(Employee {
    id: 1,
    name: "Alice".to_string(),
    salary: 50_000.0,
  });
  staff.push_back(Employee {
    id: 2,
    name: "Bob".to_string(),
    salary: 60_000.0,
  });
  staff.insert(1, Employee {
    id: 99,
    name: "Inserted".to_string(),
    salary: 9_900.0,
  });
  for employee in &staff {
    println!("  #{} {} earns {}", employee.id, employee.name, employee.salary);
  }
  staff.remove(1);

  numbers.pop_front();
  numbers.pop_back();
  println!("after pops: {numbers:?}");
  println!("{shared}");

  let separate = Arena::new(512)?;
  let mut elsewhere = List::new_in(&separate);
  elsewhere.extend((0..3).map(|i| i * 200));
  println!(
    "lists share an arena: {}",
    numbers.allocator().is_same(*elsewhere.allocator())
  );
  println!("{separate}");
  Ok(())
}
