use gamefeed_core::{classify, KindSignals};

pub fn run(title: &str, link: &str, categories: &[String], content: &str, source: &str) {
    let kind = classify(&KindSignals {
        title,
        source,
        link,
        categories,
        content,
    });

    println!("{}", kind.label());
}
