//! Fruit List Example
//!
//! Renders a small collection through a slow item template, then adds,
//! removes and resets records while printing the list markup.

use std::fs::File;
use std::time::Duration;

use listview::prelude::*;
use serde_json::Value;
use simplelog::{Config, LevelFilter, WriteLogger};

fn fruit(id: i64, name: &str) -> Model {
    Model::with_id(id).set("name", name)
}

/// Item data arrives a second late, as if fetched.
fn slow_template() -> Template {
    Template::new(|data: Value| async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let id = data
            .get("id")
            .and_then(RecordId::from_value)
            .ok_or_else(|| TemplateError::new("fruit has no id"))?;
        let name = data["name"].as_str().unwrap_or("?");
        Ok(Element::li()
            .id(id.as_str())
            .text(format!("id: {id} - {name}")))
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set up file logging
    if let Ok(log_file) = File::create("fruits.log") {
        let _ = WriteLogger::init(LevelFilter::Trace, Config::default(), log_file);
    }

    let fruits = VecCollection::new(vec![
        fruit(1, "apple"),
        fruit(2, "banana"),
        fruit(3, "pineapple"),
    ]);
    let surface = ElementSurface::list();
    let config = ListConfig::builder(slow_template())
        .on_error(|error| eprintln!("Error: {error}"))
        .build();

    let view = match ListView::new(config, &fruits, surface.clone()) {
        Ok(view) => view,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    view.settled().await;
    println!("initial:  {}", surface.render());

    fruits.add(fruit(4, "cherry"));
    fruits.remove(&RecordId::from(2i64));
    view.settled().await;
    println!("changed:  {}", surface.render());

    fruits.reset(vec![fruit(5, "mango"), fruit(6, "kiwi")]);
    view.settled().await;
    println!("reset:    {}", surface.render());
}
