//! Shared fixtures: a Berlin evening with calm and high-stimulation events.

#![allow(dead_code)]

use kiezplan_core::{Event, Persona, Session};
use serde_json::{json, Value};

fn event(value: Value) -> Event {
    serde_json::from_value(value).expect("fixture event")
}

pub fn with(base: &Event, id: &str, start: Option<&str>, end: Option<&str>) -> Event {
    let mut value = serde_json::to_value(base).unwrap();
    value["id"] = json!(id);
    value["startTime"] = json!(start);
    value["endTime"] = json!(end);
    event(value)
}

pub fn tech_meetup() -> Event {
    event(json!({
        "id": "e1", "title": "AI Meetup", "date": "2026-02-18",
        "startTime": "18:00", "endTime": "20:00",
        "district": "Kreuzberg", "venue": "Betahaus",
        "category": "tech", "subtags": ["ai", "networking"],
        "priceEurMin": 0, "priceEurMax": 0,
        "socialDensity": 0.8, "socialOpenness": 0.7, "energyLevel": 0.6,
        "crowdVector": {"founders": 0.8, "investors": 0.5},
        "accessDifficulty": 0.2
    }))
}

pub fn gallery_opening() -> Event {
    event(json!({
        "id": "e2", "title": "Gallery Opening", "date": "2026-02-18",
        "startTime": "17:00", "endTime": "21:00",
        "district": "Mitte", "venue": "KW Institute",
        "category": "art", "subtags": ["contemporary", "opening"],
        "priceEurMin": 0, "priceEurMax": 0,
        "socialDensity": 0.6, "socialOpenness": 0.8, "energyLevel": 0.4,
        "crowdVector": {"artists": 0.9},
        "accessDifficulty": 0.2
    }))
}

pub fn club_night() -> Event {
    event(json!({
        "id": "e3", "title": "Club Night", "date": "2026-02-18",
        "startTime": "23:00", "endTime": null,
        "district": "Friedrichshain",
        "category": "club", "subtags": ["techno", "nightlife"],
        "priceEurMin": 15, "priceEurMax": 20,
        "socialDensity": 0.9, "socialOpenness": 0.3, "energyLevel": 0.95,
        "crowdVector": {"artists": 0.5},
        "accessDifficulty": 0.9
    }))
}

pub fn quiet_museum() -> Event {
    event(json!({
        "id": "e-museum", "title": "Modern Masters", "date": "2026-02-18",
        "startTime": "10:00", "endTime": "18:00",
        "district": "Mitte", "venue": "Neue Nationalgalerie",
        "category": "art", "subtags": ["gallery", "modern art"],
        "priceEurMin": 14, "priceEurMax": 14,
        "socialDensity": 0.3, "socialOpenness": 0.2, "energyLevel": 0.3,
        "crowdVector": {"tourists": 0.6, "artists": 0.4},
        "accessDifficulty": 0.1
    }))
}

pub fn calm_walk() -> Event {
    event(json!({
        "id": "e-walk", "title": "Spree River Winter Walk", "date": "2026-02-18",
        "startTime": "14:00", "endTime": "16:00",
        "district": "Mitte", "venue": null,
        "category": "community", "subtags": ["walking", "outdoor", "casual"],
        "priceEurMin": 0, "priceEurMax": 0,
        "socialDensity": 0.2, "socialOpenness": 0.9, "energyLevel": 0.3,
        "crowdVector": {"tourists": 0.4},
        "accessDifficulty": 0.0
    }))
}

pub fn silent_film() -> Event {
    event(json!({
        "id": "e-film", "title": "Silent Film Night", "date": "2026-02-18",
        "startTime": "20:30", "endTime": "22:30",
        "district": "Kreuzberg", "venue": "Babylon",
        "category": "film", "subtags": ["silent film", "live music", "culture"],
        "priceEurMin": 10, "priceEurMax": 10,
        "socialDensity": 0.3, "socialOpenness": 0.2, "energyLevel": 0.3,
        "crowdVector": {"artists": 0.5, "tourists": 0.3},
        "accessDifficulty": 0.1
    }))
}

pub fn yoga() -> Event {
    event(json!({
        "id": "e-yoga", "title": "Vinyasa Flow", "date": "2026-02-18",
        "startTime": "07:30", "endTime": "08:30",
        "district": "Neukölln",
        "category": "community", "subtags": ["yoga", "wellness", "morning"],
        "priceEurMin": 12, "priceEurMax": 12,
        "socialDensity": 0.2, "socialOpenness": 0.3, "energyLevel": 0.3,
        "accessDifficulty": 0.1
    }))
}

pub fn pitch_night() -> Event {
    event(json!({
        "id": "e-pitch", "title": "Web3 Pitch Night", "date": "2026-02-18",
        "startTime": "19:00", "endTime": "22:00",
        "district": "Kreuzberg", "venue": "Betahaus",
        "category": "tech", "subtags": ["web3", "pitching", "startups"],
        "priceEurMin": 0, "priceEurMax": 0,
        "socialDensity": 0.8, "socialOpenness": 0.7, "energyLevel": 0.7,
        "crowdVector": {"founders": 0.9, "investors": 0.9},
        "accessDifficulty": 0.3
    }))
}

pub fn founder_dinner() -> Event {
    event(json!({
        "id": "e-dinner", "title": "Founder Dinner (invite only)", "date": "2026-02-18",
        "startTime": "19:00", "endTime": "22:00",
        "district": "Mitte", "venue": "Grill Royal",
        "category": "community", "subtags": ["founders", "dinner", "exclusive"],
        "priceEurMin": 0, "priceEurMax": 0,
        "socialDensity": 0.5, "socialOpenness": 0.3, "energyLevel": 0.4,
        "crowdVector": {"founders": 0.95, "investors": 0.7},
        "accessDifficulty": 0.8
    }))
}

pub fn vc_coffee() -> Event {
    event(json!({
        "id": "e-vc", "title": "VC Coffee & Dealflow", "date": "2026-02-18",
        "startTime": "08:30", "endTime": "10:00",
        "district": "Mitte", "venue": "Soho House",
        "category": "tech", "subtags": ["vc", "investing", "founders"],
        "priceEurMin": 0, "priceEurMax": 0,
        "socialDensity": 0.5, "socialOpenness": 0.4, "energyLevel": 0.3,
        "crowdVector": {"investors": 0.95, "founders": 0.8},
        "accessDifficulty": 0.6
    }))
}

pub fn evening() -> Vec<Event> {
    vec![tech_meetup(), gallery_opening(), club_night()]
}

/// Calm events first, then the draining ones.
pub fn recovery_pool() -> Vec<Event> {
    vec![
        quiet_museum(),
        calm_walk(),
        silent_film(),
        yoga(),
        pitch_night(),
        founder_dinner(),
        vc_coffee(),
        tech_meetup(),
        club_night(),
    ]
}

pub const CALM_IDS: [&str; 4] = ["e-museum", "e-walk", "e-film", "e-yoga"];
pub const NETWORKING_IDS: [&str; 4] = ["e-pitch", "e-dinner", "e-vc", "e1"];

pub fn founder() -> Persona {
    serde_json::from_value(json!({
        "id": "p1", "name": "Crypto Founder",
        "homeBaseDistricts": ["Mitte", "Kreuzberg"],
        "interests": {"tech": 0.9, "community": 0.6, "art": 0.3, "club": 0.5},
        "crowdPreferences": {"founders": 0.9, "investors": 0.8, "artists": 0.3}
    }))
    .unwrap()
}

pub fn recovering() -> Persona {
    serde_json::from_value(json!({
        "id": "p3", "name": "Recovery Mode",
        "homeBaseDistricts": ["Neukölln", "Kreuzberg"],
        "interests": {"community": 0.7, "art": 0.6, "other": 0.5, "music": 0.4},
        "constraintLatestStart": "20:00",
        "hardNopes": ["club", "nightlife"]
    }))
    .unwrap()
}

pub fn culture() -> Persona {
    serde_json::from_value(json!({
        "id": "p2", "name": "Culture Explorer",
        "homeBaseDistricts": ["Mitte"],
        "interests": {"art": 0.9, "music": 0.8, "film": 0.7},
        "crowdPreferences": {"artists": 0.8},
        "constraintBudgetMax": 30,
        "constraintLatestStart": "22:00",
        "hardNopes": ["techno"]
    }))
    .unwrap()
}

pub fn network_session() -> Session {
    serde_json::from_value(json!({
        "intent": "network", "energy": "high", "socialMode": "crowd",
        "districtFocus": ["Kreuzberg"], "budgetToday": null,
        "dateFrom": "2026-02-16", "dateTo": "2026-02-22"
    }))
    .unwrap()
}

pub fn recover_session() -> Session {
    serde_json::from_value(json!({
        "intent": "recover", "energy": "low", "socialMode": "solo",
        "districtFocus": [], "budgetToday": 20,
        "dateFrom": "2026-02-16", "dateTo": "2026-02-22"
    }))
    .unwrap()
}
