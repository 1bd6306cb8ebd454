use models::Person;

use crate::errors::ServiceError;
use crate::person::repository::PersonRepository;

const SAMPLE_PEOPLE: [(&str, i32, [&str; 3]); 16] = [
    ("Alice Johnson", 28, ["Photography", "Traveling", "Cooking"]),
    ("Bob Smith", 32, ["Reading", "Hiking", "Cycling"]),
    ("Charlie Brown", 25, ["Gaming", "Music", "Drawing"]),
    ("David Wilson", 30, ["Swimming", "Chess", "Writing"]),
    ("Eve Davis", 27, ["Yoga", "Gardening", "Knitting"]),
    ("Frank Miller", 29, ["Surfing", "Video Games", "Rock Climbing"]),
    ("Grace Lee", 31, ["Dance", "Cooking", "Traveling"]),
    ("Henry Taylor", 26, ["Photography", "Blogging", "Reading"]),
    ("Ivy Martinez", 33, ["Fitness", "Traveling", "Painting"]),
    ("Jack Anderson", 34, ["Fishing", "Cooking", "Basketball"]),
    ("Kimberly Thomas", 22, ["Baking", "Reading", "Volunteering"]),
    ("Liam Jackson", 24, ["Coding", "Running", "Music"]),
    ("Mia White", 35, ["Dancing", "Theater", "Crafting"]),
    ("Noah Harris", 28, ["Traveling", "Drawing", "Camping"]),
    ("Olivia Clark", 31, ["Reading", "Yoga", "Traveling"]),
    ("Paul Lewis", 29, ["Video Games", "Football", "Photography"]),
];

/// Sample records, each with a fresh identifier.
pub fn sample_people() -> Vec<Person> {
    SAMPLE_PEOPLE
        .iter()
        .map(|(name, age, hobbies)| Person::new(*name, *age, hobbies.iter().map(|h| h.to_string()).collect()))
        .collect()
}

/// Populate `repo` with the sample records; returns how many were added.
pub async fn seed_people<R: PersonRepository + ?Sized>(repo: &R) -> Result<usize, ServiceError> {
    let people = sample_people();
    let count = people.len();
    for person in people {
        repo.add(person).await?;
    }
    Ok(count)
}
