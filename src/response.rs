use crate::config::FirmProfile;
use crate::intent::Intent;
use crate::language::Language;

/// Render the reply for a classified intent. Pure function of its inputs:
/// identical (intent, language, profile) always produce identical text.
pub fn generate(intent: Intent, language: Language, profile: &FirmProfile) -> String {
    match (intent, language) {
        (Intent::Escalate, Language::Pt) => {
            "Compreendo que precisa de falar com um dos nossos advogados. \
             Vou transferir a sua conversa para um membro da nossa equipa. \
             Por favor, aguarde um momento."
                .to_string()
        }
        (Intent::Escalate, Language::En) => {
            "I understand you need to speak with one of our lawyers. \
             I'll transfer your conversation to a member of our team. \
             Please wait a moment."
                .to_string()
        }
        (Intent::Schedule, Language::Pt) => format!(
            "Para agendar uma consulta com os nossos advogados, \
             pode usar o nosso sistema online: {}\n\n\
             Horários de atendimento:\n• {}\n• {}\n• Fuso horário: {}",
            profile.calendly_link,
            profile.hours.weekdays,
            profile.hours.saturday,
            profile.hours.timezone,
        ),
        (Intent::Schedule, Language::En) => format!(
            "To schedule a consultation with our lawyers, \
             you can use our online system: {}\n\n\
             Business hours:\n• {}\n• {}\n• Timezone: {}",
            profile.calendly_link,
            profile.hours.weekdays,
            profile.hours.saturday,
            profile.hours.timezone,
        ),
        (Intent::Greeting, Language::Pt) => format!(
            "Olá! Bem-vindo(a) à {}. Sou o assistente virtual e estou aqui \
             para ajudar. Como posso ser útil hoje?",
            profile.name,
        ),
        (Intent::Greeting, Language::En) => format!(
            "Hello! Welcome to {}. I'm the virtual assistant and I'm here \
             to help. How can I assist you today?",
            profile.name,
        ),
        (Intent::Hours, Language::Pt) => format!(
            "Os nossos horários de atendimento são:\n• {}\n• {}\n• Fuso horário: {}",
            profile.hours.weekdays, profile.hours.saturday, profile.hours.timezone,
        ),
        (Intent::Hours, Language::En) => format!(
            "Our business hours are:\n• {}\n• {}\n• Timezone: {}",
            profile.hours.weekdays, profile.hours.saturday, profile.hours.timezone,
        ),
        (Intent::Location, Language::Pt) => format!(
            "Temos escritórios em {}. Para mais informações e agendamentos: {}",
            profile.locations, profile.calendly_link,
        ),
        (Intent::Location, Language::En) => format!(
            "We have offices in {}. For more information and appointments: {}",
            profile.locations, profile.calendly_link,
        ),
        (Intent::Services, Language::Pt) => format!(
            "Oferecemos serviços jurídicos em diversas áreas do direito. \
             Para informações detalhadas sobre as nossas especialidades e \
             para agendar uma consulta: {}",
            profile.calendly_link,
        ),
        (Intent::Services, Language::En) => format!(
            "We offer legal services in various areas of law. \
             For detailed information about our specialties and \
             to schedule a consultation: {}",
            profile.calendly_link,
        ),
        (Intent::Contact, Language::Pt) => format!(
            "Pode contactar-nos pelo telefone {} ou agendar uma consulta \
             online: {}",
            profile.phone, profile.calendly_link,
        ),
        (Intent::Contact, Language::En) => format!(
            "You can reach us by phone at {} or schedule a consultation \
             online: {}",
            profile.phone, profile.calendly_link,
        ),
        (Intent::Fallback, Language::Pt) => format!(
            "Obrigado pela sua mensagem. Para melhor o ajudar com a sua \
             questão, recomendo que agende uma consulta com um dos nossos \
             advogados: {}",
            profile.calendly_link,
        ),
        (Intent::Fallback, Language::En) => format!(
            "Thank you for your message. To better assist you with your \
             inquiry, I recommend scheduling a consultation with one of our \
             lawyers: {}",
            profile.calendly_link,
        ),
    }
}
